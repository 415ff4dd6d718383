//! Lock state machine.
//!
//! Owns the process-wide [`LockState`] behind a mutex and is the only code
//! allowed to start a clamp loop. Toggling off is a non-blocking request to
//! the running loop; the loop's own exit path performs the teardown.

use crate::{
    CoreResult, CursorClamp, LockError, Notifier, WindowHandle, WindowQuery,
    lock::{LockSession, LockSnapshot, LockState, clamp_loop},
};

use std::{
    panic::Location,
    sync::{Arc, Condvar, Mutex, MutexGuard},
    time::Duration,
};

use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Clamp loop period. Shorter ticks fight window switching harder and cost more CPU.
pub const DEFAULT_TICK: Duration = Duration::from_millis(50);

/// How long `force_unlock` waits for a running clamp loop to exit.
pub const DEFAULT_UNLOCK_WAIT: Duration = Duration::from_millis(100);

/// Timing parameters of the lock machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockTiming {
    /// Sleep between clamp loop iterations. Bounds cancellation latency.
    pub tick: Duration,
    /// Upper bound on how long `force_unlock` waits for the loop to exit.
    pub unlock_wait: Duration,
}

impl Default for LockTiming {
    fn default() -> Self {
        Self {
            tick: DEFAULT_TICK,
            unlock_wait: DEFAULT_UNLOCK_WAIT,
        }
    }
}

/// Result of a [`LockMachine::toggle`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// A new lock session started on `window`.
    Locked {
        /// Session id used for log correlation.
        session_id: Uuid,
        /// The window the cursor is now confined to.
        window: WindowHandle,
        /// Window title, truncated for display.
        title: String,
    },
    /// The running clamp loop was asked to stop.
    UnlockRequested,
    /// An unlock was already requested and the loop has not exited yet.
    UnlockPending,
    /// There was no visible foreground window to lock to.
    NoActiveWindow,
    /// The foreground window is too small (minimized or hidden).
    DegenerateWindow {
        /// Rectangle width.
        width: i32,
        /// Rectangle height.
        height: i32,
    },
    /// The previous clamp loop is still tearing down; nothing was started.
    Stopping,
}

pub(crate) struct Shared {
    state: Mutex<LockState>,
    loop_exited: Condvar,
    pub(crate) windows: Arc<dyn WindowQuery>,
    pub(crate) clamp: Arc<dyn CursorClamp>,
    pub(crate) notifier: Arc<dyn Notifier>,
    pub(crate) timing: LockTiming,
}

impl Shared {
    pub(crate) fn lock_state(&self) -> MutexGuard<'_, LockState> {
        self.state.lock().unwrap_or_else(|e| {
            error!("Lock state mutex poisoned, recovering: {}", e);
            e.into_inner()
        })
    }

    /// Clear the OS clamp and reset the state. Does not wait for anything.
    pub(crate) fn clear(&self, state: &mut LockState) {
        if let Err(e) = self.clamp.release() {
            warn!(error = ?e, "Failed to release cursor clamp");
        }
        state.reset();
    }

    /// Final step of every clamp loop: clear and free the loop slot.
    pub(crate) fn finish_loop(&self, session_id: Uuid) {
        let mut state = self.lock_state();
        if state.worker == Some(session_id) {
            state.force_unlock_requested = true;
            self.clear(&mut state);
            state.worker = None;
        } else {
            warn!(session_id = %session_id, "Clamp loop slot owned by another session");
        }
        drop(state);
        self.loop_exited.notify_all();
    }
}

/// The lock state machine. Cheap to clone; clones share one state.
#[derive(Clone)]
pub struct LockMachine {
    shared: Arc<Shared>,
}

impl LockMachine {
    /// Create an unlocked machine over the given OS collaborators.
    pub fn new(
        windows: Arc<dyn WindowQuery>,
        clamp: Arc<dyn CursorClamp>,
        notifier: Arc<dyn Notifier>,
        timing: LockTiming,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(LockState::default()),
                loop_exited: Condvar::new(),
                windows,
                clamp,
                notifier,
                timing,
            }),
        }
    }

    /// Lock to the foreground window, or ask the running lock to stop.
    ///
    /// Precondition failures (no window, degenerate rectangle, previous loop
    /// still exiting) leave the state untouched and are reported through the
    /// outcome rather than as errors.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn toggle(&self) -> CoreResult<ToggleOutcome> {
        let mut state = self.shared.lock_state();

        if state.is_locked {
            if state.force_unlock_requested {
                debug!(window = ?state.locked_window, "Unlock already pending");
                return Ok(ToggleOutcome::UnlockPending);
            }
            state.force_unlock_requested = true;
            info!(window = ?state.locked_window, "Unlock requested");
            return Ok(ToggleOutcome::UnlockRequested);
        }

        if let Some(session_id) = state.worker {
            debug!(session_id = %session_id, "Previous clamp loop still exiting");
            return Ok(ToggleOutcome::Stopping);
        }

        let Some(window) = self.shared.windows.foreground_window() else {
            debug!("No foreground window");
            return Ok(ToggleOutcome::NoActiveWindow);
        };

        let info = match self.shared.windows.window_info(window) {
            Ok(info) => info,
            Err(e) => {
                debug!(window = %window, error = ?e, "Foreground window not usable");
                return Ok(ToggleOutcome::NoActiveWindow);
            }
        };

        if !info.rect.is_clampable() {
            debug!(window = %window, rect = ?info.rect, "Window rectangle too small to lock");
            return Ok(ToggleOutcome::DegenerateWindow {
                width: info.rect.width(),
                height: info.rect.height(),
            });
        }

        let session = LockSession {
            session_id: Uuid::new_v4(),
            window,
            rect: info.rect,
            title: info.display_title(),
        };

        state.is_locked = true;
        state.locked_window = Some(window);
        state.force_unlock_requested = false;
        state.worker = Some(session.session_id);

        let outcome = ToggleOutcome::Locked {
            session_id: session.session_id,
            window,
            title: session.title.clone(),
        };

        // The loop blocks on the state mutex at its first tick until we return.
        if let Err(source) = clamp_loop::spawn(Arc::clone(&self.shared), session) {
            state.reset();
            state.worker = None;
            return Err(LockError::WorkerSpawnFailed {
                source,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        info!(outcome = ?outcome, "Cursor locked");

        Ok(outcome)
    }

    /// Clear the clamp and reset to `Unlocked` from any state.
    ///
    /// Waits up to [`LockTiming::unlock_wait`] for a running clamp loop to
    /// observe the reset and exit, then returns regardless. Idempotent.
    #[instrument(skip(self))]
    pub fn force_unlock(&self) -> LockSnapshot {
        let mut state = self.shared.lock_state();
        self.shared.clear(&mut state);

        let (state, wait) = self
            .shared
            .loop_exited
            .wait_timeout_while(state, self.shared.timing.unlock_wait, |s| {
                s.worker.is_some()
            })
            .unwrap_or_else(|e| {
                error!("Lock state mutex poisoned while waiting, recovering");
                e.into_inner()
            });

        if wait.timed_out() && state.worker.is_some() {
            debug!("Clamp loop still exiting after unlock wait, continuing");
        }

        info!("Forcefully unlocked cursor and reset state");

        state.snapshot()
    }

    /// Current state, read under the mutex.
    pub fn snapshot(&self) -> LockSnapshot {
        self.shared.lock_state().snapshot()
    }
}
