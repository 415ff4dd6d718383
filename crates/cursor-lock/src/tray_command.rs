use std::sync::mpsc::Sender;

use global_hotkey::hotkey::HotKey;

/// Reply channel for a request the main thread answers.
pub type Reply<T> = Sender<Result<T, String>>;

/// Commands sent from worker threads to the main UI thread.
///
/// The main thread owns `TrayManager` (because `TrayIcon` is `!Send`) and the
/// `GlobalHotKeyManager`, so all tray mutations, hotkey registrations and
/// process lifecycle events flow through this enum.
#[derive(Debug, Clone)]
pub enum TrayCommand {
    /// Refresh the "Current Hotkey" menu label.
    SetHotkeyLabel(String),
    /// Register a global hotkey and report the outcome.
    RegisterHotkey {
        /// Hotkey to register.
        hotkey: HotKey,
        /// Where the outcome is sent.
        reply: Reply<()>,
    },
    /// Unregister a global hotkey and report the outcome.
    UnregisterHotkey {
        /// Hotkey to unregister.
        hotkey: HotKey,
        /// Where the outcome is sent.
        reply: Reply<()>,
    },
    /// Remove the tray icon.
    Detach,
    /// Shut down the application. The main thread will exit the event loop.
    Shutdown,
}
