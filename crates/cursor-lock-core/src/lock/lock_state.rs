use crate::WindowHandle;

use uuid::Uuid;

/// Externally visible phase of the lock machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockPhase {
    /// No clamp loop is running and nothing is locked.
    Unlocked,
    /// A clamp loop holds the cursor inside the locked window.
    Locked,
    /// Unlock was requested; the clamp loop has not finished its teardown yet.
    ForceStopping,
}

/// The single process-wide lock state. Only ever accessed behind the
/// lock machine's mutex.
#[derive(Debug, Default)]
pub(crate) struct LockState {
    pub(crate) is_locked: bool,
    pub(crate) locked_window: Option<WindowHandle>,
    pub(crate) force_unlock_requested: bool,
    /// Session id of the clamp loop currently alive, if any.
    pub(crate) worker: Option<Uuid>,
}

impl LockState {
    /// Drop the lock. Leaves `worker` alone: only the loop itself clears it.
    pub(crate) fn reset(&mut self) {
        self.is_locked = false;
        self.locked_window = None;
        self.force_unlock_requested = false;
    }

    /// Whether the clamp loop for `session_id` should run another tick.
    pub(crate) fn keeps_running(&self, session_id: Uuid) -> bool {
        self.is_locked && !self.force_unlock_requested && self.worker == Some(session_id)
    }

    pub(crate) fn phase(&self) -> LockPhase {
        if self.worker.is_some() && (self.force_unlock_requested || !self.is_locked) {
            LockPhase::ForceStopping
        } else if self.is_locked {
            LockPhase::Locked
        } else {
            LockPhase::Unlocked
        }
    }

    pub(crate) fn snapshot(&self) -> LockSnapshot {
        LockSnapshot {
            is_locked: self.is_locked,
            locked_window: self.locked_window,
            force_unlock_requested: self.force_unlock_requested,
            loop_active: self.worker.is_some(),
            phase: self.phase(),
        }
    }
}

/// Copy of the lock state taken under the mutex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockSnapshot {
    /// Whether the cursor is locked.
    pub is_locked: bool,
    /// The locked window; `Some` exactly when `is_locked`.
    pub locked_window: Option<WindowHandle>,
    /// Cooperative stop signal for the clamp loop.
    pub force_unlock_requested: bool,
    /// Whether a clamp loop thread is still alive.
    pub loop_active: bool,
    /// Phase derived from the fields above.
    pub phase: LockPhase,
}
