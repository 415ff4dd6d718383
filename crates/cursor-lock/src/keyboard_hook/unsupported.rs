//! Stand-in for platforms without a low-level keyboard hook.

use std::panic::Location;

use cursor_lock_core::{CoreResult, HookId, KeyHandler, KeyboardHook, LockError};
use error_location::ErrorLocation;

/// Always refuses to install.
#[derive(Debug, Default)]
pub struct LowLevelKeyboardHook;

impl LowLevelKeyboardHook {
    pub fn new() -> Self {
        Self
    }
}

impl KeyboardHook for LowLevelKeyboardHook {
    #[track_caller]
    fn install(&self, _handler: KeyHandler) -> CoreResult<HookId> {
        Err(LockError::Unsupported {
            operation: "keyboard hook".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    #[track_caller]
    fn uninstall(&self, id: HookId) -> CoreResult<()> {
        Err(LockError::HookUninstallFailed {
            reason: format!("hook {} is not installed", id.raw()),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
