use crate::config::{default_min_spacing_ms, default_notifications_enabled};

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Desktop notification settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Show notifications at all. When off, notices are only logged.
    #[serde(default = "default_notifications_enabled")]
    pub enabled: bool,
    /// Minimum gap between two consecutive notifications, in milliseconds.
    #[serde(default = "default_min_spacing_ms")]
    pub min_spacing_ms: u64,
}

impl NotificationConfig {
    /// Spacing as a `Duration`.
    pub fn min_spacing(&self) -> Duration {
        Duration::from_millis(self.min_spacing_ms)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: default_notifications_enabled(),
            min_spacing_ms: default_min_spacing_ms(),
        }
    }
}
