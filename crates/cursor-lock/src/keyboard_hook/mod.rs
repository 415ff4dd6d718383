//! Low-level keyboard observer used while recording a new hotkey.

mod key_names;
#[cfg(not(target_os = "windows"))]
mod unsupported;
#[cfg(target_os = "windows")]
mod windows;

#[cfg_attr(not(target_os = "windows"), allow(unused_imports))]
pub(crate) use key_names::key_name;
#[cfg(not(target_os = "windows"))]
pub(crate) use unsupported::LowLevelKeyboardHook;
#[cfg(target_os = "windows")]
pub(crate) use self::windows::LowLevelKeyboardHook;
#[cfg(all(test, target_os = "windows"))]
pub(crate) use self::windows::run_hook_message_loop;
