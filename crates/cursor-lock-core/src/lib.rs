//! Cursor Lock Core Library
//!
//! Confines the mouse cursor to one chosen window and keeps that window
//! focused until released. The crate holds the concurrent state machines;
//! every OS facility is a trait supplied by the host application.
//!
//! # Example
//!
//! ```no_run
//! use cursor_lock_core::{Command, Coordinator, CoreResult, HotkeyBinding, LockTiming, Platform};
//!
//! fn run(platform: Platform) -> CoreResult<()> {
//!     let coordinator = Coordinator::new(platform, LockTiming::default());
//!     coordinator.start(HotkeyBinding::parse("ctrl+alt+l")?)?;
//!
//!     coordinator.dispatch(Command::ToggleLock);
//!     coordinator.dispatch(Command::Exit);
//!     Ok(())
//! }
//! ```

mod coordinator;
mod error;
mod geometry;
mod hotkey;
mod lock;
mod notice;
mod window;

pub use {
    coordinator::{Command, Coordinator, Flow, Platform, RebindOutcome, SettingsStore, TraySurface},
    error::{LockError, Result as CoreResult},
    geometry::{MIN_DIM, Rect},
    hotkey::{
        CaptureOutcome, HookId, HotkeyBinder, HotkeyBinding, HotkeyCapture, HotkeyRegistry,
        KeyEvent, KeyHandler, KeyboardHook, MODIFIERS, StartOutcome, canonical_key_name,
        is_modifier,
    },
    lock::{LockMachine, LockPhase, LockSnapshot, LockTiming, LoopExit, ToggleOutcome},
    notice::{Notice, Notifier},
    window::{CursorClamp, WindowHandle, WindowInfo, WindowQuery},
};

#[cfg(test)]
mod tests;
