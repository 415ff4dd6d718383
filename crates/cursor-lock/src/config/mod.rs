mod config_store;
#[allow(clippy::module_inception)]
mod config;
mod hotkey_config;
mod lock_config;
mod notification_config;

pub(crate) use {
    config::Config, config_store::ConfigStore, hotkey_config::HotkeyConfig,
    lock_config::LockConfig, notification_config::NotificationConfig,
};

pub(crate) const DEFAULT_BINDING: &str = "alt+ctrl+l";
pub(crate) const DEFAULT_TICK_MS: u64 = 50;
pub(crate) const DEFAULT_UNLOCK_WAIT_MS: u64 = 100;
pub(crate) const DEFAULT_NOTIFICATIONS_ENABLED: bool = true;
pub(crate) const DEFAULT_MIN_SPACING_MS: u64 = 500;

pub(crate) fn default_binding() -> String {
    DEFAULT_BINDING.to_string()
}

pub(crate) fn default_tick_ms() -> u64 {
    DEFAULT_TICK_MS
}

pub(crate) fn default_unlock_wait_ms() -> u64 {
    DEFAULT_UNLOCK_WAIT_MS
}

pub(crate) fn default_notifications_enabled() -> bool {
    DEFAULT_NOTIFICATIONS_ENABLED
}

pub(crate) fn default_min_spacing_ms() -> u64 {
    DEFAULT_MIN_SPACING_MS
}
