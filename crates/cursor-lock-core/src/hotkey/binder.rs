use crate::{
    CoreResult,
    hotkey::{HotkeyBinding, HotkeyRegistry},
};

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, error, info, instrument};

/// Owner of the single active global hotkey.
///
/// Replacement removes the old binding before installing the new one. If
/// installation fails the binder is left explicitly unbound; it never falls
/// back to the stale binding.
pub struct HotkeyBinder {
    registry: Arc<dyn HotkeyRegistry>,
    active: Mutex<Option<HotkeyBinding>>,
}

impl HotkeyBinder {
    /// Create an unbound binder.
    pub fn new(registry: Arc<dyn HotkeyRegistry>) -> Self {
        Self {
            registry,
            active: Mutex::new(None),
        }
    }

    fn active_guard(&self) -> MutexGuard<'_, Option<HotkeyBinding>> {
        self.active.lock().unwrap_or_else(|e| {
            error!("Hotkey binder mutex poisoned, recovering: {}", e);
            e.into_inner()
        })
    }

    /// The active binding, or `None` when no hotkey is bound.
    pub fn active(&self) -> Option<HotkeyBinding> {
        self.active_guard().clone()
    }

    /// Swap the active binding for `binding`.
    ///
    /// The whole remove-then-add runs under the binder's mutex, so other
    /// callers never observe a half-replaced registration.
    #[instrument(skip(self), fields(binding = %binding))]
    pub fn replace(&self, binding: HotkeyBinding) -> CoreResult<()> {
        let mut active = self.active_guard();

        if let Some(old) = active.take() {
            match self.registry.remove(&old) {
                Ok(()) => debug!(old = %old, "Previous hotkey removed"),
                Err(e) => debug!(old = %old, error = ?e, "Previous hotkey already gone"),
            }
        }

        self.registry.add(&binding)?;

        info!(binding = %binding, "Hotkey bound");
        *active = Some(binding);

        Ok(())
    }
}
