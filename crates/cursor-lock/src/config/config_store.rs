use crate::config::Config;

use std::{panic::Location, sync::Mutex};

use cursor_lock_core::{CoreResult, HotkeyBinding, LockError, SettingsStore};
use error_location::ErrorLocation;
use tracing::{error, info, instrument};

/// [`SettingsStore`] backed by the on-disk TOML config.
pub struct ConfigStore {
    config: Mutex<Config>,
}

impl ConfigStore {
    /// Wrap an already loaded configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config: Mutex::new(config),
        }
    }
}

impl SettingsStore for ConfigStore {
    #[track_caller]
    #[instrument(skip(self), fields(binding = %binding))]
    fn persist_binding(&self, binding: &HotkeyBinding) -> CoreResult<()> {
        let mut config = self.config.lock().unwrap_or_else(|e| {
            error!("Config mutex poisoned, recovering");
            e.into_inner()
        });

        config.hotkey.binding = binding.to_string();
        config.save().map_err(|e| LockError::SettingsFailed {
            reason: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!("Hotkey persisted");
        Ok(())
    }
}
