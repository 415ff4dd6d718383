//! Window query and cursor clamp collaborators.
//!
//! Both are leaves with no state of their own: they wrap OS calls and are
//! injected into the lock machine as trait objects so that the state machine
//! can be driven by fakes in tests.

use crate::{CoreResult, Rect};

use std::fmt;

/// Maximum number of title characters kept for display.
pub(crate) const TITLE_DISPLAY_CHARS: usize = 60;

/// Opaque OS window identifier.
///
/// The handle is only referenced, never owned. The window behind it may be
/// destroyed at any moment, so every dereference goes through
/// [`WindowQuery`] and failures mean "window gone".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(isize);

impl WindowHandle {
    /// Wrap a raw platform handle value.
    pub const fn from_raw(raw: isize) -> Self {
        Self(raw)
    }

    /// The raw platform handle value.
    pub const fn raw(&self) -> isize {
        self.0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Geometry and title of a visible window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    /// Window rectangle in screen coordinates.
    pub rect: Rect,
    /// Window title; empty titles are reported as `Untitled Window`.
    pub title: String,
}

impl WindowInfo {
    /// Create window info, substituting a placeholder for an empty title.
    pub fn new(rect: Rect, title: impl Into<String>) -> Self {
        let title = title.into();
        let title = if title.is_empty() {
            "Untitled Window".to_string()
        } else {
            title
        };
        Self { rect, title }
    }

    /// Title truncated to 60 characters, with `...` appended when cut.
    pub fn display_title(&self) -> String {
        let mut chars = self.title.chars();
        let head: String = chars.by_ref().take(TITLE_DISPLAY_CHARS).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }
}

/// Read-only access to OS windows plus the focus request.
pub trait WindowQuery: Send + Sync {
    /// The current foreground window, if any.
    fn foreground_window(&self) -> Option<WindowHandle>;

    /// Rectangle and title of a visible window.
    ///
    /// Returns [`LockError::WindowGone`](crate::LockError::WindowGone) when
    /// the window was destroyed or is not visible.
    fn window_info(&self, window: WindowHandle) -> CoreResult<WindowInfo>;

    /// Whether the handle still refers to an existing window.
    fn is_window(&self, window: WindowHandle) -> bool;

    /// Ask the OS to bring `window` to the foreground. Best effort.
    fn focus_window(&self, window: WindowHandle) -> CoreResult<()>;
}

/// OS-level cursor confinement.
pub trait CursorClamp: Send + Sync {
    /// Confine the cursor to `rect`.
    fn confine(&self, rect: Rect) -> CoreResult<()>;

    /// Remove any confinement. Clearing an already clear clamp succeeds.
    fn release(&self) -> CoreResult<()>;
}
