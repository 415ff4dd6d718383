/// Commands sent from the hotkey listener to the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// The bound global hotkey was pressed.
    HotkeyPressed,
}
