//! Interactive hotkey recording.
//!
//! `Idle -> Recording -> Idle`. While recording, an exclusive keyboard
//! observer feeds key-downs into a set; the first key-up commits whatever
//! was collected ("release-to-commit").

use crate::{
    CoreResult,
    hotkey::{HookId, HotkeyBinding, KeyEvent, KeyHandler, KeyboardHook, canonical_key_name},
};

use std::{
    collections::BTreeSet,
    mem,
    sync::{Arc, Mutex, MutexGuard},
};

use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Result of [`HotkeyCapture::start_recording`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new recording session is running.
    Started {
        /// Session id used for log correlation and to discard stale events.
        session_id: Uuid,
    },
    /// A recording was already in progress; nothing changed.
    AlreadyRecording,
}

/// Result of a finished recording session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// A key was released before any key-down was seen.
    NoKeysRecorded,
    /// The keys held when the first key was released.
    Recorded(HotkeyBinding),
}

#[derive(Debug)]
struct RecordingSession {
    session_id: Uuid,
    hook: Option<HookId>,
    keys_seen: BTreeSet<String>,
}

#[derive(Debug, Default)]
enum CaptureState {
    #[default]
    Idle,
    Recording(RecordingSession),
}

/// Hotkey capture subsystem. Owns the recording session exclusively.
pub struct HotkeyCapture {
    keyboard: Arc<dyn KeyboardHook>,
    state: Mutex<CaptureState>,
}

impl HotkeyCapture {
    /// Create an idle capture subsystem over a keyboard hook.
    pub fn new(keyboard: Arc<dyn KeyboardHook>) -> Self {
        Self {
            keyboard,
            state: Mutex::new(CaptureState::Idle),
        }
    }

    fn state(&self) -> MutexGuard<'_, CaptureState> {
        self.state.lock().unwrap_or_else(|e| {
            error!("Capture state mutex poisoned, recovering: {}", e);
            e.into_inner()
        })
    }

    /// Whether a recording session is in progress.
    pub fn is_recording(&self) -> bool {
        matches!(*self.state(), CaptureState::Recording(_))
    }

    /// Begin recording. No-op when a session is already running.
    ///
    /// `handler_for` builds the key handler for the new session id; the
    /// handler is expected to feed events back into
    /// [`handle_key_event`](Self::handle_key_event).
    #[instrument(skip(self, handler_for))]
    pub fn start_recording<F>(&self, handler_for: F) -> CoreResult<StartOutcome>
    where
        F: FnOnce(Uuid) -> KeyHandler,
    {
        let mut state = self.state();

        if matches!(*state, CaptureState::Recording(_)) {
            debug!("Recording already in progress");
            return Ok(StartOutcome::AlreadyRecording);
        }

        let session_id = Uuid::new_v4();

        // Held across install so events cannot race the hook id being stored.
        let hook = self.keyboard.install(handler_for(session_id))?;

        *state = CaptureState::Recording(RecordingSession {
            session_id,
            hook: Some(hook),
            keys_seen: BTreeSet::new(),
        });

        info!(session_id = %session_id, hook = ?hook, "Hotkey recording started");

        Ok(StartOutcome::Started { session_id })
    }

    /// Feed one key event into the session `session_id`.
    ///
    /// Returns the outcome when this event finished the recording. Events
    /// for any other session, or arriving while idle, are ignored.
    pub fn handle_key_event(&self, session_id: Uuid, event: KeyEvent) -> Option<CaptureOutcome> {
        let mut state = self.state();

        let CaptureState::Recording(session) = &mut *state else {
            return None;
        };
        if session.session_id != session_id {
            debug!(session_id = %session_id, "Ignoring key event from stale session");
            return None;
        }

        match event {
            KeyEvent::Down(name) => {
                let name = canonical_key_name(&name);
                if !name.is_empty() && session.keys_seen.insert(name.clone()) {
                    debug!(session_id = %session_id, key = %name, "Key recorded");
                }
                None
            }
            KeyEvent::Up(name) => {
                debug!(session_id = %session_id, key = %name, "Key released, finishing recording");
                let CaptureState::Recording(session) = mem::take(&mut *state) else {
                    return None;
                };
                Some(self.finish(session))
            }
        }
    }

    /// Drop an in-flight recording without reporting. Returns whether one was running.
    #[instrument(skip(self))]
    pub fn abandon(&self) -> bool {
        let mut state = self.state();
        match mem::take(&mut *state) {
            CaptureState::Recording(mut session) => {
                self.unhook(&mut session);
                info!(session_id = %session.session_id, "Hotkey recording abandoned");
                true
            }
            CaptureState::Idle => false,
        }
    }

    fn finish(&self, mut session: RecordingSession) -> CaptureOutcome {
        self.unhook(&mut session);

        match HotkeyBinding::from_keys(&session.keys_seen) {
            Some(binding) => {
                info!(session_id = %session.session_id, binding = %binding, "Hotkey recorded");
                CaptureOutcome::Recorded(binding)
            }
            None => {
                info!(session_id = %session.session_id, "No keys recorded");
                CaptureOutcome::NoKeysRecorded
            }
        }
    }

    /// Uninstall the session's observer. `take` makes a second call a no-op.
    fn unhook(&self, session: &mut RecordingSession) {
        if let Some(hook) = session.hook.take() {
            if let Err(e) = self.keyboard.uninstall(hook) {
                warn!(hook = ?hook, error = ?e, "Failed to uninstall keyboard hook");
            }
        }
    }
}
