//! Win32 implementation.

use std::{ffi::c_void, panic::Location};

use cursor_lock_core::{
    CoreResult, CursorClamp, LockError, Rect, WindowHandle, WindowInfo, WindowQuery,
};
use error_location::ErrorLocation;
use tracing::{debug, instrument};
use windows::Win32::{
    Foundation::{HWND, RECT},
    UI::WindowsAndMessaging::{
        ClipCursor, GetForegroundWindow, GetWindowRect, GetWindowTextW, IsWindow,
        IsWindowVisible, SetForegroundWindow,
    },
};

const TITLE_BUFFER_LEN: usize = 512;

/// Desktop access through the Win32 API.
#[derive(Debug, Default)]
pub struct Desktop;

impl Desktop {
    pub fn new() -> Self {
        Self
    }
}

fn to_hwnd(window: WindowHandle) -> HWND {
    HWND(window.raw() as *mut c_void)
}

fn to_rect(rect: &RECT) -> Rect {
    Rect::new(rect.left, rect.top, rect.right, rect.bottom)
}

impl WindowQuery for Desktop {
    fn foreground_window(&self) -> Option<WindowHandle> {
        // SAFETY: no preconditions.
        let hwnd = unsafe { GetForegroundWindow() };
        if hwnd.is_invalid() {
            None
        } else {
            Some(WindowHandle::from_raw(hwnd.0 as isize))
        }
    }

    #[track_caller]
    fn window_info(&self, window: WindowHandle) -> CoreResult<WindowInfo> {
        let location = ErrorLocation::from(Location::caller());
        let hwnd = to_hwnd(window);

        // SAFETY: IsWindow and IsWindowVisible accept any handle value.
        let usable = unsafe { IsWindow(Some(hwnd)).as_bool() && IsWindowVisible(hwnd).as_bool() };
        if !usable {
            return Err(LockError::WindowGone {
                reason: format!("window {} is closed or hidden", window),
                location,
            });
        }

        let mut rect = RECT::default();
        // SAFETY: rect is a valid out pointer for the duration of the call.
        unsafe { GetWindowRect(hwnd, &mut rect) }.map_err(|e| LockError::WindowGone {
            reason: format!("GetWindowRect failed: {}", e),
            location,
        })?;

        let mut buffer = [0u16; TITLE_BUFFER_LEN];
        // SAFETY: the buffer outlives the call and its length is passed along.
        let len = unsafe { GetWindowTextW(hwnd, &mut buffer) };
        let len = usize::try_from(len).unwrap_or(0).min(buffer.len());
        let title = String::from_utf16_lossy(&buffer[..len]);

        Ok(WindowInfo::new(to_rect(&rect), title))
    }

    fn is_window(&self, window: WindowHandle) -> bool {
        // SAFETY: IsWindow accepts any handle value.
        unsafe { IsWindow(Some(to_hwnd(window))).as_bool() }
    }

    #[track_caller]
    fn focus_window(&self, window: WindowHandle) -> CoreResult<()> {
        // SAFETY: SetForegroundWindow accepts any handle value.
        let granted = unsafe { SetForegroundWindow(to_hwnd(window)).as_bool() };
        if granted {
            Ok(())
        } else {
            Err(LockError::FocusDenied {
                reason: format!("SetForegroundWindow refused window {}", window),
                location: ErrorLocation::from(Location::caller()),
            })
        }
    }
}

impl CursorClamp for Desktop {
    #[track_caller]
    fn confine(&self, rect: Rect) -> CoreResult<()> {
        let clip = RECT {
            left: rect.left,
            top: rect.top,
            right: rect.right,
            bottom: rect.bottom,
        };
        // SAFETY: clip lives for the duration of the call.
        unsafe { ClipCursor(Some(&clip as *const RECT)) }.map_err(|e| LockError::ClampFailed {
            reason: format!("ClipCursor failed: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    #[track_caller]
    #[instrument(skip(self))]
    fn release(&self) -> CoreResult<()> {
        // SAFETY: a null rectangle removes the confinement.
        unsafe { ClipCursor(None) }.map_err(|e| LockError::ClampFailed {
            reason: format!("ClipCursor(None) failed: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;
        debug!("Cursor clip released");
        Ok(())
    }
}
