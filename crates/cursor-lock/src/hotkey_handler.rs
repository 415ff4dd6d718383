//! Global hotkey plumbing.
//!
//! Registration has to happen on the main thread, where `tao` pumps the
//! messages `global-hotkey` relies on. [`HotkeyRegistrar`] is the
//! thread-safe face the core sees; it forwards requests to the
//! [`HotkeyHost`] living on the main thread. [`HotkeyHandler`] listens for
//! presses on the async runtime and reports them to the app.

use crate::{AppCommand, AppError, AppResult, MainThread, TrayCommand};

use std::{
    collections::HashMap,
    panic::Location,
    str::FromStr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU32, Ordering},
    },
    time::Duration,
};

use cursor_lock_core::{CoreResult, HotkeyBinding, HotkeyRegistry, LockError};
use error_location::ErrorLocation;
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState, hotkey::HotKey};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, warn};

/// Convert a binding into a `global-hotkey` accelerator.
///
/// A binding needs exactly one non-modifier key.
#[track_caller]
pub fn to_hotkey(binding: &HotkeyBinding) -> CoreResult<HotKey> {
    let main_keys: Vec<&str> = binding.main_keys().collect();

    let key = match main_keys.as_slice() {
        [key] => *key,
        [] => {
            return Err(LockError::HotkeyInstallFailed {
                binding: binding.to_string(),
                reason: "a hotkey needs one non-modifier key".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        _ => {
            return Err(LockError::HotkeyInstallFailed {
                binding: binding.to_string(),
                reason: "only one non-modifier key is supported".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
    };

    let accelerator = binding
        .modifiers()
        .map(modifier_token)
        .chain(std::iter::once(key_token(key)))
        .collect::<Vec<_>>()
        .join("+");

    HotKey::from_str(&accelerator).map_err(|e| LockError::HotkeyInstallFailed {
        binding: binding.to_string(),
        reason: format!("unsupported key '{}': {}", key, e),
        location: ErrorLocation::from(Location::caller()),
    })
}

fn modifier_token(name: &str) -> String {
    match name {
        "ctrl" => "CONTROL",
        "alt" => "ALT",
        "shift" => "SHIFT",
        _ => "SUPER",
    }
    .to_string()
}

fn key_token(name: &str) -> String {
    match name {
        "esc" => "ESCAPE".to_string(),
        "num lock" => "NUMLOCK".to_string(),
        "num add" => "NUMPADADD".to_string(),
        "num -" => "NUMPADSUBTRACT".to_string(),
        "num *" => "NUMPADMULTIPLY".to_string(),
        "num /" => "NUMPADDIVIDE".to_string(),
        "num ." => "NUMPADDECIMAL".to_string(),
        other => match other.strip_prefix("num ") {
            Some(digit) => format!("NUMPAD{}", digit),
            None => other.replace(' ', "").to_uppercase(),
        },
    }
}

/// Owns the `GlobalHotKeyManager`. Main thread only.
pub struct HotkeyHost {
    manager: GlobalHotKeyManager,
}

impl HotkeyHost {
    /// Create the manager.
    ///
    /// Must be called on a thread with a message pump (the main thread
    /// running the `tao` event loop) so that `WM_HOTKEY` messages are
    /// dispatched on Windows.
    #[track_caller]
    #[instrument]
    pub fn new() -> AppResult<Self> {
        let manager =
            GlobalHotKeyManager::new().map_err(|e| AppError::HotkeyRegistrationFailed {
                reason: format!("Failed to create manager: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(Self { manager })
    }

    /// Handle a registration request coming from a worker thread.
    pub fn handle(&self, command: TrayCommand) {
        match command {
            TrayCommand::RegisterHotkey { hotkey, reply } => {
                let result = self.manager.register(hotkey).map_err(|e| e.to_string());
                let _ = reply.send(result);
            }
            TrayCommand::UnregisterHotkey { hotkey, reply } => {
                let result = self.manager.unregister(hotkey).map_err(|e| e.to_string());
                let _ = reply.send(result);
            }
            other => warn!(command = ?other, "Not a hotkey command"),
        }
    }
}

/// Thread-safe [`HotkeyRegistry`] that delegates to the main thread.
pub struct HotkeyRegistrar {
    main_thread: Arc<MainThread>,
    registered: Mutex<HashMap<String, HotKey>>,
    active_id: AtomicU32,
}

impl HotkeyRegistrar {
    pub fn new(main_thread: Arc<MainThread>) -> Self {
        Self {
            main_thread,
            registered: Mutex::new(HashMap::new()),
            active_id: AtomicU32::new(0),
        }
    }

    /// Whether `id` belongs to the currently bound hotkey.
    pub fn is_active(&self, id: u32) -> bool {
        let active = self.active_id.load(Ordering::Acquire);
        active != 0 && active == id
    }

    fn registered(&self) -> std::sync::MutexGuard<'_, HashMap<String, HotKey>> {
        self.registered.lock().unwrap_or_else(|e| {
            error!("Hotkey table mutex poisoned, recovering");
            e.into_inner()
        })
    }
}

impl HotkeyRegistry for HotkeyRegistrar {
    #[track_caller]
    #[instrument(skip(self), fields(binding = %binding))]
    fn add(&self, binding: &HotkeyBinding) -> CoreResult<()> {
        let hotkey = to_hotkey(binding)?;

        self.main_thread
            .request(|reply| TrayCommand::RegisterHotkey { hotkey, reply })
            .map_err(|e| LockError::HotkeyInstallFailed {
                binding: binding.to_string(),
                reason: install_reason(e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.registered().insert(binding.to_string(), hotkey);
        self.active_id.store(hotkey.id(), Ordering::Release);

        info!(hotkey_id = hotkey.id(), "Global hotkey registered");
        Ok(())
    }

    #[track_caller]
    #[instrument(skip(self), fields(binding = %binding))]
    fn remove(&self, binding: &HotkeyBinding) -> CoreResult<()> {
        let Some(hotkey) = self.registered().remove(binding.as_str()) else {
            return Err(LockError::HotkeyRemoveFailed {
                binding: binding.to_string(),
                reason: "not registered".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        };

        let _ = self.active_id.compare_exchange(
            hotkey.id(),
            0,
            Ordering::AcqRel,
            Ordering::Acquire,
        );

        self.main_thread
            .request(|reply| TrayCommand::UnregisterHotkey { hotkey, reply })
            .map_err(|e| LockError::HotkeyRemoveFailed {
                binding: binding.to_string(),
                reason: install_reason(e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        debug!(hotkey_id = hotkey.id(), "Global hotkey unregistered");
        Ok(())
    }
}

fn install_reason(error: AppError) -> String {
    match error {
        AppError::HotkeyRegistrationFailed { reason, .. } => reason,
        other => other.to_string(),
    }
}

/// Listens for global hotkey presses and forwards them to the app.
pub struct HotkeyHandler {
    registrar: Arc<HotkeyRegistrar>,
    command_tx: mpsc::Sender<AppCommand>,
}

impl HotkeyHandler {
    /// Create a listener. Only presses of the hotkey currently bound through
    /// `registrar` are forwarded.
    pub fn new(registrar: Arc<HotkeyRegistrar>, command_tx: mpsc::Sender<AppCommand>) -> Self {
        Self {
            registrar,
            command_tx,
        }
    }

    /// Run the hotkey listener until a shutdown signal is received.
    #[instrument(skip(self))]
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        let receiver = GlobalHotKeyEvent::receiver().clone();
        let (event_tx, mut event_rx) = mpsc::channel(32);

        // GlobalHotKeyEvent::receiver() is a crossbeam receiver with a
        // blocking recv(). When event_rx is dropped the next blocking_send()
        // fails and the task ends.
        let handle = tokio::task::spawn_blocking(move || {
            while let Ok(event) = receiver.recv() {
                if event_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Hotkey handler shutting down");
                    break;
                }
                Some(event) = event_rx.recv() => {
                    if event.state == HotKeyState::Pressed && self.registrar.is_active(event.id) {
                        self.command_tx
                            .send(AppCommand::HotkeyPressed)
                            .await
                            .map_err(|e| AppError::ChannelSendFailed {
                                message: format!("Failed to send HotkeyPressed: {}", e),
                                location: ErrorLocation::from(Location::caller()),
                            })?;
                    }
                }
            }
        }

        drop(event_rx);

        // The blocking task may be parked in recv() until the next hotkey
        // event; the runtime cleans it up on exit.
        match tokio::time::timeout(Duration::from_secs(1), handle).await {
            Ok(Ok(())) => debug!("Hotkey event forwarder stopped cleanly"),
            Ok(Err(e)) => warn!(error = ?e, "Hotkey event forwarder task panicked"),
            Err(_) => debug!("Hotkey event forwarder did not stop within timeout"),
        }

        Ok(())
    }
}
