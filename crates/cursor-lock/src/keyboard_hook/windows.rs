//! `WH_KEYBOARD_LL` implementation.
//!
//! The hook runs on its own thread with a Win32 message loop. The callback
//! only translates the event and pushes it into a channel; a second thread
//! drains the channel and invokes the handler, keeping the callback well
//! under the OS hook timeout.

use crate::keyboard_hook::key_name;

use std::{
    panic::Location,
    sync::{Mutex, mpsc},
    thread,
    time::Duration,
};

use cursor_lock_core::{CoreResult, HookId, KeyEvent, KeyHandler, KeyboardHook, LockError};
use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument, warn};
use windows::Win32::{
    Foundation::{LPARAM, LRESULT, WPARAM},
    System::Threading::GetCurrentThreadId,
    UI::WindowsAndMessaging::{
        CallNextHookEx, DispatchMessageW, GetMessageW, HC_ACTION, KBDLLHOOKSTRUCT, MSG,
        PM_NOREMOVE, PeekMessageW, PostThreadMessageW, SetWindowsHookExW, UnhookWindowsHookEx,
        WH_KEYBOARD_LL, WM_KEYDOWN, WM_KEYUP, WM_QUIT, WM_SYSKEYDOWN, WM_SYSKEYUP,
    },
};

const HOOK_READY_TIMEOUT: Duration = Duration::from_secs(2);

/// Where the hook callback delivers events. `None` while no observer is
/// installed.
static EVENT_SINK: Mutex<Option<mpsc::Sender<KeyEvent>>> = Mutex::new(None);

struct ActiveHook {
    id: HookId,
    thread_id: u32,
}

/// One observer at a time, installed on demand.
#[derive(Default)]
pub struct LowLevelKeyboardHook {
    active: Mutex<Option<ActiveHook>>,
}

impl LowLevelKeyboardHook {
    pub fn new() -> Self {
        Self::default()
    }

    fn active(&self) -> std::sync::MutexGuard<'_, Option<ActiveHook>> {
        self.active.lock().unwrap_or_else(|e| {
            error!("Keyboard hook mutex poisoned, recovering");
            e.into_inner()
        })
    }
}

fn set_sink(sink: Option<mpsc::Sender<KeyEvent>>) {
    let mut slot = EVENT_SINK.lock().unwrap_or_else(|e| e.into_inner());
    *slot = sink;
}

impl KeyboardHook for LowLevelKeyboardHook {
    #[track_caller]
    #[instrument(skip(self, handler))]
    fn install(&self, handler: KeyHandler) -> CoreResult<HookId> {
        let mut active = self.active();

        if active.is_some() {
            return Err(LockError::HookInstallFailed {
                reason: "a keyboard hook is already installed".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let (event_tx, event_rx) = mpsc::channel::<KeyEvent>();
        thread::Builder::new()
            .name("key-dispatch".to_string())
            .spawn(move || {
                for event in event_rx {
                    handler(event);
                }
                debug!("Key dispatch thread finished");
            })
            .map_err(|e| LockError::HookInstallFailed {
                reason: format!("Failed to spawn dispatch thread: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        // Dropping event_tx on any failure below ends the dispatch thread.
        set_sink(Some(event_tx));

        let (ready_tx, ready_rx) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name("keyboard-hook".to_string())
            .spawn(move || run_hook_message_loop(ready_tx));

        if let Err(e) = spawned {
            set_sink(None);
            return Err(LockError::HookInstallFailed {
                reason: format!("Failed to spawn hook thread: {}", e),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let thread_id = match ready_rx.recv_timeout(HOOK_READY_TIMEOUT) {
            Ok(Ok(thread_id)) => thread_id,
            Ok(Err(reason)) => {
                set_sink(None);
                return Err(LockError::HookInstallFailed {
                    reason,
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            Err(e) => {
                set_sink(None);
                return Err(LockError::HookInstallFailed {
                    reason: format!("Hook thread did not report back: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        let id = HookId::from_raw(u64::from(thread_id));
        *active = Some(ActiveHook { id, thread_id });

        info!(hook_id = id.raw(), "Keyboard hook installed");
        Ok(id)
    }

    #[track_caller]
    #[instrument(skip(self))]
    fn uninstall(&self, id: HookId) -> CoreResult<()> {
        let mut active = self.active();

        let hook = match active.take() {
            Some(hook) if hook.id == id => hook,
            other => {
                *active = other;
                return Err(LockError::HookUninstallFailed {
                    reason: format!("hook {} is not installed", id.raw()),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        set_sink(None);

        // SAFETY: posting to a thread id has no memory-safety preconditions.
        unsafe { PostThreadMessageW(hook.thread_id, WM_QUIT, WPARAM(0), LPARAM(0)) }.map_err(
            |e| LockError::HookUninstallFailed {
                reason: format!("Failed to stop hook thread: {}", e),
                location: ErrorLocation::from(Location::caller()),
            },
        )?;

        info!(hook_id = id.raw(), "Keyboard hook removed");
        Ok(())
    }
}

/// Entry point for the hook thread. Reports its thread id once the hook is
/// in place, then pumps messages until `WM_QUIT`. Returns right away, with
/// the hook removed, when the installer is no longer listening.
pub(crate) fn run_hook_message_loop(ready: mpsc::Sender<Result<u32, String>>) {
    let mut msg = MSG::default();

    // SAFETY: creates this thread's message queue so PostThreadMessageW
    // cannot race ahead of GetMessageW.
    unsafe {
        let _ = PeekMessageW(&mut msg, None, 0, 0, PM_NOREMOVE);
    }

    // SAFETY: the hook is installed from the thread that runs its message loop.
    let hook = match unsafe { SetWindowsHookExW(WH_KEYBOARD_LL, Some(keyboard_hook_proc), None, 0) }
    {
        Ok(hook) => hook,
        Err(e) => {
            let _ = ready.send(Err(format!("SetWindowsHookExW failed: {}", e)));
            return;
        }
    };

    // SAFETY: no preconditions.
    let thread_id = unsafe { GetCurrentThreadId() };
    if ready.send(Ok(thread_id)).is_err() {
        // Nobody holds our thread id, so nothing could ever post WM_QUIT.
        warn!("Installer gave up waiting for the keyboard hook, removing it");
        // SAFETY: hook was installed above on this thread.
        if let Err(e) = unsafe { UnhookWindowsHookEx(hook) } {
            warn!(error = %e, "UnhookWindowsHookEx failed");
        }
        return;
    }

    // SAFETY: standard GetMessage/DispatchMessage loop; -1 signals an error.
    unsafe {
        while GetMessageW(&mut msg, None, 0, 0).0 > 0 {
            DispatchMessageW(&msg);
        }
        if let Err(e) = UnhookWindowsHookEx(hook) {
            warn!(error = %e, "UnhookWindowsHookEx failed");
        }
    }

    debug!("Keyboard hook thread finished");
}

/// Low-level keyboard hook callback.
///
/// # Safety
///
/// Called by Windows on the hook thread. `l_param` points to a
/// `KBDLLHOOKSTRUCT` whenever `n_code == HC_ACTION`.
unsafe extern "system" fn keyboard_hook_proc(
    n_code: i32,
    w_param: WPARAM,
    l_param: LPARAM,
) -> LRESULT {
    if n_code == HC_ACTION as i32 {
        // SAFETY: see function docs.
        let kbs = unsafe { &*(l_param.0 as *const KBDLLHOOKSTRUCT) };
        let name = key_name(kbs.vkCode);

        let event = match w_param.0 as u32 {
            WM_KEYDOWN | WM_SYSKEYDOWN => Some(KeyEvent::Down(name)),
            WM_KEYUP | WM_SYSKEYUP => Some(KeyEvent::Up(name)),
            _ => None,
        };

        if let Some(event) = event {
            if let Ok(sink) = EVENT_SINK.lock() {
                if let Some(tx) = sink.as_ref() {
                    let _ = tx.send(event);
                }
            }
        }
    }

    // SAFETY: events are never swallowed; always pass them along.
    unsafe { CallNextHookEx(None, n_code, w_param, l_param) }
}
