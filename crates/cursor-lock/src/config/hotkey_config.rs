use crate::config::{DEFAULT_BINDING, default_binding};

use cursor_lock_core::{CoreResult, HotkeyBinding};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Hotkey settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotkeyConfig {
    /// Canonical binding string, e.g. `alt+ctrl+l`.
    #[serde(default = "default_binding")]
    pub binding: String,
}

impl HotkeyConfig {
    /// Parsed binding, falling back to the default when the stored text is
    /// not a valid binding.
    pub fn binding(&self) -> CoreResult<HotkeyBinding> {
        HotkeyBinding::parse(&self.binding).or_else(|e| {
            warn!(
                configured = %self.binding,
                error = %e,
                "Invalid hotkey in config, using default"
            );
            HotkeyBinding::parse(DEFAULT_BINDING)
        })
    }
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            binding: default_binding(),
        }
    }
}
