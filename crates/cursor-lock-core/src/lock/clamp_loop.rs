//! Background clamp loop.
//!
//! One thread per lock session. Every tick it re-applies the clamp to the
//! rectangle captured at lock time and pulls the locked window back to the
//! foreground. Cancellation is cooperative: the loop reads the shared state
//! once per tick, so stop latency is bounded by one tick period.

use crate::{Notice, Rect, WindowHandle, lock::machine::Shared};

use std::{io, sync::Arc, thread};

use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Everything a clamp loop needs to know about its session.
#[derive(Debug, Clone)]
pub(crate) struct LockSession {
    pub(crate) session_id: Uuid,
    pub(crate) window: WindowHandle,
    /// Rectangle captured at lock time. Not re-queried: if the window moves,
    /// the clamp box stays put.
    pub(crate) rect: Rect,
    pub(crate) title: String,
}

/// Why a clamp loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// `force_unlock_requested` was observed.
    Cancelled,
    /// The state was reset to unlocked by `force_unlock`.
    Released,
    /// The locked window could not be queried before the first clamp.
    WindowUnavailable,
    /// The locked window was destroyed while locked.
    WindowClosed,
}

pub(crate) fn spawn(shared: Arc<Shared>, session: LockSession) -> io::Result<()> {
    thread::Builder::new()
        .name("clamp-loop".to_string())
        .spawn(move || run(shared, session))
        .map(|_| ())
}

/// RAII teardown: runs the force-unlock path exactly once on every exit,
/// including unwinding out of a panicking tick.
struct TeardownGuard {
    shared: Arc<Shared>,
    session_id: Uuid,
}

impl Drop for TeardownGuard {
    fn drop(&mut self) {
        if thread::panicking() {
            error!(session_id = %self.session_id, "Clamp loop panicked, tearing down");
        }
        self.shared.finish_loop(self.session_id);
        debug!(session_id = %self.session_id, "Clamp loop teardown complete");
    }
}

#[instrument(skip(shared, session), fields(session_id = %session.session_id))]
fn run(shared: Arc<Shared>, session: LockSession) {
    let _teardown = TeardownGuard {
        shared: Arc::clone(&shared),
        session_id: session.session_id,
    };

    let exit = clamp_until_stopped(&shared, &session);

    info!(exit = ?exit, title = %session.title, "Clamp loop exiting");
}

fn clamp_until_stopped(shared: &Shared, session: &LockSession) -> LoopExit {
    if let Err(e) = shared.windows.window_info(session.window) {
        warn!(window = %session.window, error = ?e, "Locked window not available");
        shared.lock_state().force_unlock_requested = true;
        shared.notifier.notify(Notice::window_unavailable());
        return LoopExit::WindowUnavailable;
    }

    loop {
        {
            // Clamp under the mutex so force_unlock cannot interleave between
            // the liveness check and the confine call.
            let state = shared.lock_state();
            if !state.keeps_running(session.session_id) {
                return if state.is_locked {
                    LoopExit::Cancelled
                } else {
                    LoopExit::Released
                };
            }
            if let Err(e) = shared.clamp.confine(session.rect) {
                debug!(error = ?e, "Clamp failed, retrying next tick");
            }
        }

        if !shared.windows.is_window(session.window) {
            warn!(window = %session.window, "Locked window closed");
            shared.notifier.notify(Notice::window_unavailable());
            return LoopExit::WindowClosed;
        }

        if shared.windows.foreground_window() != Some(session.window) {
            if let Err(e) = shared.windows.focus_window(session.window) {
                debug!(error = ?e, "Refocus failed, retrying next tick");
            }
        }

        thread::sleep(shared.timing.tick);
    }
}
