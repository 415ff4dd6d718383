//! Coordinator: the single entry point for every user action.
//!
//! Tray menu items and the global hotkey are mapped onto a fixed [`Command`]
//! enum and dispatched through [`Coordinator::dispatch`]. Completion of a
//! hotkey recording is wired to the rebind here, and hotkey presses are
//! dropped while a recording owns the keyboard.

use crate::{
    CoreResult, CursorClamp, LockError, LockMachine, LockSnapshot, LockTiming, Notice, Notifier,
    ToggleOutcome, WindowQuery,
    hotkey::{
        CaptureOutcome, HotkeyBinder, HotkeyBinding, HotkeyCapture, HotkeyRegistry, KeyEvent,
        KeyHandler, KeyboardHook, StartOutcome,
    },
};

use std::sync::{
    Arc, Weak,
    atomic::{AtomicBool, Ordering},
};

use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// User-facing actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Record a new global hotkey.
    SetNewHotkey,
    /// Lock to the foreground window, or unlock.
    ToggleLock,
    /// Unconditionally unlock.
    ForceUnlock,
    /// Shut down and leave.
    Exit,
}

/// What the caller should do after a dispatched command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep running.
    Continue,
    /// Shutdown ran; terminate the process.
    Exit,
}

/// Result of a finished hotkey recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebindOutcome {
    /// Nothing was recorded; the previous binding is untouched.
    NoKeysRecorded,
    /// The new binding is active.
    Rebound(HotkeyBinding),
    /// Installing the new binding failed; no hotkey is bound now.
    Unbound {
        /// Why installation failed.
        reason: String,
    },
}

/// Tray icon surface. Only the label refresh and teardown are needed.
pub trait TraySurface: Send + Sync {
    /// Show `binding` in the non-actionable "current hotkey" label.
    fn set_hotkey_label(&self, binding: &HotkeyBinding);

    /// Remove the tray icon.
    fn detach(&self) -> CoreResult<()>;
}

/// Persistent settings.
pub trait SettingsStore: Send + Sync {
    /// Remember `binding` for the next start.
    fn persist_binding(&self, binding: &HotkeyBinding) -> CoreResult<()>;
}

/// All external collaborators the coordinator talks to.
#[derive(Clone)]
pub struct Platform {
    /// Foreground window and focus queries.
    pub windows: Arc<dyn WindowQuery>,
    /// Cursor confinement.
    pub clamp: Arc<dyn CursorClamp>,
    /// Global hotkey registration.
    pub hotkeys: Arc<dyn HotkeyRegistry>,
    /// Low-level keyboard observer used while recording.
    pub keyboard: Arc<dyn KeyboardHook>,
    /// Desktop notifications.
    pub notifier: Arc<dyn Notifier>,
    /// Tray icon.
    pub tray: Arc<dyn TraySurface>,
    /// Settings persistence.
    pub settings: Arc<dyn SettingsStore>,
}

struct Inner {
    lock: LockMachine,
    capture: HotkeyCapture,
    binder: HotkeyBinder,
    notifier: Arc<dyn Notifier>,
    tray: Arc<dyn TraySurface>,
    settings: Arc<dyn SettingsStore>,
    shut_down: AtomicBool,
}

/// Serializes every user action onto the lock machine, the capture
/// subsystem and the hotkey binder. Cheap to clone.
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<Inner>,
}

impl Coordinator {
    /// Wire the components over `platform`. Nothing is bound yet.
    pub fn new(platform: Platform, timing: LockTiming) -> Self {
        let lock = LockMachine::new(
            platform.windows,
            platform.clamp,
            Arc::clone(&platform.notifier),
            timing,
        );

        Self {
            inner: Arc::new(Inner {
                lock,
                capture: HotkeyCapture::new(platform.keyboard),
                binder: HotkeyBinder::new(platform.hotkeys),
                notifier: platform.notifier,
                tray: platform.tray,
                settings: platform.settings,
                shut_down: AtomicBool::new(false),
            }),
        }
    }

    /// Bind the initial hotkey and announce the service.
    ///
    /// On failure the coordinator keeps running unbound; the tray menu still
    /// works and a new hotkey can be recorded.
    #[instrument(skip(self), fields(binding = %binding))]
    pub fn start(&self, binding: HotkeyBinding) -> CoreResult<()> {
        match self.inner.binder.replace(binding.clone()) {
            Ok(()) => {
                self.inner.tray.set_hotkey_label(&binding);
                self.inner
                    .notifier
                    .notify(Notice::service_started(binding.as_str()));
                Ok(())
            }
            Err(e) => {
                error!(error = ?e, "Initial hotkey could not be bound");
                self.inner.notifier.notify(Notice::hotkey_error(&user_reason(&e)));
                Err(e)
            }
        }
    }

    /// Run one command.
    pub fn dispatch(&self, command: Command) -> Flow {
        debug!(command = ?command, "Dispatching command");
        match command {
            Command::SetNewHotkey => {
                if let Err(e) = self.begin_hotkey_change() {
                    error!(error = ?e, "Failed to start hotkey recording");
                }
            }
            Command::ToggleLock => {
                let _ = self.toggle();
            }
            Command::ForceUnlock => {
                self.force_unlock();
            }
            Command::Exit => {
                self.shutdown();
                return Flow::Exit;
            }
        }
        Flow::Continue
    }

    /// A press of the active global hotkey. Ignored while recording.
    pub fn on_hotkey_pressed(&self) -> Option<ToggleOutcome> {
        if self.inner.capture.is_recording() {
            debug!("Hotkey press ignored while recording");
            return None;
        }
        self.toggle()
    }

    /// Toggle the lock and tell the user what happened.
    pub fn toggle(&self) -> Option<ToggleOutcome> {
        match self.inner.lock.toggle() {
            Ok(outcome) => {
                match &outcome {
                    ToggleOutcome::Locked { .. } => {
                        self.inner.notifier.notify(Notice::lock_activated());
                    }
                    ToggleOutcome::UnlockRequested => {
                        self.inner.notifier.notify(Notice::lock_deactivated());
                    }
                    ToggleOutcome::UnlockPending => debug!("Unlock already pending"),
                    ToggleOutcome::NoActiveWindow => info!("No active window to lock"),
                    ToggleOutcome::DegenerateWindow { width, height } => {
                        warn!(width, height, "Active window too small to lock");
                    }
                    ToggleOutcome::Stopping => debug!("Previous lock still releasing"),
                }
                Some(outcome)
            }
            Err(e) => {
                error!(error = ?e, "Toggle failed");
                None
            }
        }
    }

    /// Unconditionally unlock.
    pub fn force_unlock(&self) -> LockSnapshot {
        self.inner.lock.force_unlock()
    }

    /// Start recording a new hotkey.
    pub fn begin_hotkey_change(&self) -> CoreResult<StartOutcome> {
        Inner::begin_hotkey_change(&self.inner)
    }

    /// Tear everything down, in order, each step independent of the others:
    /// unlock, drop any recording, detach the tray. Runs once.
    #[instrument(skip(self))]
    pub fn shutdown(&self) {
        if self.inner.shut_down.swap(true, Ordering::AcqRel) {
            debug!("Shutdown already performed");
            return;
        }

        let snapshot = self.inner.lock.force_unlock();
        debug!(snapshot = ?snapshot, "Lock released for shutdown");

        if self.inner.capture.abandon() {
            info!("In-flight hotkey recording stopped for shutdown");
        }

        if let Err(e) = self.inner.tray.detach() {
            warn!(error = ?e, "Failed to detach tray icon");
        }

        info!("Coordinator shut down");
    }

    /// The active binding, `None` while unbound.
    pub fn active_binding(&self) -> Option<HotkeyBinding> {
        self.inner.binder.active()
    }

    /// Current lock state.
    pub fn lock_snapshot(&self) -> LockSnapshot {
        self.inner.lock.snapshot()
    }

    /// Whether a hotkey recording is running.
    pub fn is_recording(&self) -> bool {
        self.inner.capture.is_recording()
    }
}

impl Inner {
    fn begin_hotkey_change(this: &Arc<Self>) -> CoreResult<StartOutcome> {
        let weak = Arc::downgrade(this);
        let outcome = this
            .capture
            .start_recording(|session_id| key_handler(weak, session_id))?;

        if matches!(outcome, StartOutcome::Started { .. }) {
            this.notifier.notify(Notice::recording_started());
        }

        Ok(outcome)
    }

    fn handle_key_event(&self, session_id: Uuid, event: KeyEvent) {
        if let Some(outcome) = self.capture.handle_key_event(session_id, event) {
            let _ = self.complete_recording(outcome);
        }
    }

    #[instrument(skip(self))]
    fn complete_recording(&self, outcome: CaptureOutcome) -> RebindOutcome {
        let binding = match outcome {
            CaptureOutcome::NoKeysRecorded => {
                self.notifier.notify(Notice::no_keys_recorded());
                return RebindOutcome::NoKeysRecorded;
            }
            CaptureOutcome::Recorded(binding) => binding,
        };

        if let Err(e) = self.binder.replace(binding.clone()) {
            error!(error = ?e, "New hotkey could not be installed, no hotkey is bound");
            let reason = user_reason(&e);
            self.notifier.notify(Notice::hotkey_error(&reason));
            return RebindOutcome::Unbound { reason };
        }

        self.tray.set_hotkey_label(&binding);
        if let Err(e) = self.settings.persist_binding(&binding) {
            warn!(error = ?e, "Failed to persist new hotkey");
        }
        self.notifier.notify(Notice::hotkey_saved(binding.as_str()));

        RebindOutcome::Rebound(binding)
    }
}

/// Route key events for `session_id` back into the coordinator, if it is still alive.
fn key_handler(inner: Weak<Inner>, session_id: Uuid) -> KeyHandler {
    Arc::new(move |event| {
        if let Some(inner) = inner.upgrade() {
            inner.handle_key_event(session_id, event);
        }
    })
}

/// The part of an error worth showing in a notification.
fn user_reason(error: &LockError) -> String {
    match error {
        LockError::HotkeyInstallFailed { reason, .. }
        | LockError::InvalidBinding { reason, .. }
        | LockError::HookInstallFailed { reason, .. } => reason.clone(),
        other => other.to_string(),
    }
}
