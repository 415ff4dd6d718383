use std::time::Duration;

/// A user-visible message handed to the notification surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Short heading.
    pub title: String,
    /// Body text.
    pub message: String,
    /// How long the notification should stay on screen.
    pub duration: Duration,
}

impl Notice {
    /// Create a notice shown for `seconds` seconds.
    pub fn new(title: impl Into<String>, message: impl Into<String>, seconds: u64) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            duration: Duration::from_secs(seconds),
        }
    }

    pub(crate) fn service_started(binding: &str) -> Self {
        Self::new(
            "Cursor Lock",
            format!("Service started\nPress {binding} to toggle lock"),
            3,
        )
    }

    pub(crate) fn lock_activated() -> Self {
        Self::new(
            "Cursor Lock",
            "ACTIVATED - Cursor locked to current window",
            2,
        )
    }

    pub(crate) fn lock_deactivated() -> Self {
        Self::new("Cursor Lock", "DEACTIVATED - Cursor unlocked", 2)
    }

    pub(crate) fn window_unavailable() -> Self {
        Self::new("Lock Error", "Original window not available", 3)
    }

    pub(crate) fn recording_started() -> Self {
        Self::new(
            "Hotkey Setup",
            "Recording new hotkey... Press your desired key combination",
            2,
        )
    }

    pub(crate) fn no_keys_recorded() -> Self {
        Self::new("Hotkey Setup", "No keys recorded", 2)
    }

    pub(crate) fn hotkey_saved(binding: &str) -> Self {
        Self::new("Hotkey Saved", format!("New hotkey set: {binding}"), 2)
    }

    pub(crate) fn hotkey_error(reason: &str) -> Self {
        Self::new("Hotkey Error", format!("Failed to set hotkey: {reason}"), 3)
    }
}

/// Notification surface. Delivery is best effort and must not block.
pub trait Notifier: Send + Sync {
    /// Show `notice` to the user.
    fn notify(&self, notice: Notice);
}
