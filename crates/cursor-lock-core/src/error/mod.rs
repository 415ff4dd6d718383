use error_location::ErrorLocation;
use thiserror::Error;

/// Cursor lock errors with source location tracking.
///
/// Every variant is recoverable: the lock machine degrades to `Unlocked`
/// and the hotkey binder to an explicit unbound state.
#[derive(Error, Debug)]
pub enum LockError {
    /// The referenced window no longer exists or is not visible.
    #[error("Window gone: {reason} {location}")]
    WindowGone {
        /// Description of why the window is considered gone.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The OS refused to bring the locked window to the foreground.
    #[error("Focus request denied: {reason} {location}")]
    FocusDenied {
        /// Description of the focus failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Applying or clearing the cursor confinement failed.
    #[error("Cursor clamp failed: {reason} {location}")]
    ClampFailed {
        /// Description of the clamp failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The background clamp worker could not be started.
    #[error("Failed to spawn clamp worker: {source} {location}")]
    WorkerSpawnFailed {
        /// Underlying thread spawn error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The low-level keyboard observer could not be installed.
    #[error("Keyboard hook install failed: {reason} {location}")]
    HookInstallFailed {
        /// Description of the install failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The low-level keyboard observer could not be removed.
    #[error("Keyboard hook uninstall failed: {reason} {location}")]
    HookUninstallFailed {
        /// Description of the uninstall failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Registering a global hotkey failed.
    #[error("Hotkey install failed for '{binding}': {reason} {location}")]
    HotkeyInstallFailed {
        /// Canonical binding that could not be installed.
        binding: String,
        /// Description of the install failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Removing a global hotkey failed.
    #[error("Hotkey remove failed for '{binding}': {reason} {location}")]
    HotkeyRemoveFailed {
        /// Canonical binding that could not be removed.
        binding: String,
        /// Description of the removal failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A hotkey string could not be turned into a binding.
    #[error("Invalid hotkey binding '{input}': {reason} {location}")]
    InvalidBinding {
        /// The rejected input.
        input: String,
        /// Description of the problem.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The operation is not available on this platform.
    #[error("Unsupported on this platform: {operation} {location}")]
    Unsupported {
        /// Name of the unsupported operation.
        operation: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The tray surface could not be reached.
    #[error("Tray unavailable: {reason} {location}")]
    TrayUnavailable {
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Persisting settings failed.
    #[error("Settings error: {reason} {location}")]
    SettingsFailed {
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`LockError`].
pub type Result<T> = std::result::Result<T, LockError>;
