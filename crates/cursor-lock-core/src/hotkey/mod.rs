mod binder;
mod binding;
mod capture;

pub use {
    binder::HotkeyBinder,
    binding::{HotkeyBinding, MODIFIERS, canonical_key_name, is_modifier},
    capture::{CaptureOutcome, HotkeyCapture, StartOutcome},
};

use crate::CoreResult;

use std::sync::Arc;

/// A raw key transition observed by the keyboard hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyEvent {
    /// Key pressed, with the platform's key name.
    Down(String),
    /// Key released, with the platform's key name.
    Up(String),
}

/// Identifier of an installed keyboard observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

impl HookId {
    /// Wrap a platform hook identifier.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The platform hook identifier.
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

/// Callback invoked for every key event while an observer is installed.
pub type KeyHandler = Arc<dyn Fn(KeyEvent) + Send + Sync>;

/// Low-level keyboard observer.
pub trait KeyboardHook: Send + Sync {
    /// Install an observer delivering every key event to `handler`.
    fn install(&self, handler: KeyHandler) -> CoreResult<HookId>;

    /// Remove a previously installed observer.
    fn uninstall(&self, id: HookId) -> CoreResult<()>;
}

/// Global hotkey registration.
///
/// Presses of a registered binding are reported back to the coordinator,
/// which routes them to the lock toggle.
pub trait HotkeyRegistry: Send + Sync {
    /// Register `binding` as a global hotkey.
    fn add(&self, binding: &HotkeyBinding) -> CoreResult<()>;

    /// Unregister `binding`. Removing an unknown binding is an error the
    /// caller is expected to tolerate.
    fn remove(&self, binding: &HotkeyBinding) -> CoreResult<()>;
}
