#[cfg(target_os = "windows")]
mod keyboard_hook;
mod notifier;
