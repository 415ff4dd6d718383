//! Stand-in for platforms without a cursor clip API.

use std::panic::Location;

use cursor_lock_core::{
    CoreResult, CursorClamp, LockError, Rect, WindowHandle, WindowInfo, WindowQuery,
};
use error_location::ErrorLocation;

/// Reports no foreground window, so locking is never attempted.
#[derive(Debug, Default)]
pub struct Desktop;

impl Desktop {
    pub fn new() -> Self {
        Self
    }
}

#[track_caller]
fn unsupported(operation: &str) -> LockError {
    LockError::Unsupported {
        operation: operation.to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}

impl WindowQuery for Desktop {
    fn foreground_window(&self) -> Option<WindowHandle> {
        None
    }

    fn window_info(&self, _window: WindowHandle) -> CoreResult<WindowInfo> {
        Err(unsupported("window_info"))
    }

    fn is_window(&self, _window: WindowHandle) -> bool {
        false
    }

    fn focus_window(&self, _window: WindowHandle) -> CoreResult<()> {
        Err(unsupported("focus_window"))
    }
}

impl CursorClamp for Desktop {
    fn confine(&self, _rect: Rect) -> CoreResult<()> {
        Err(unsupported("confine"))
    }

    fn release(&self) -> CoreResult<()> {
        Ok(())
    }
}
