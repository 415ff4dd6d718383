//! Window queries and cursor confinement for the host OS.

#[cfg(target_os = "windows")]
mod windows;
#[cfg(not(target_os = "windows"))]
mod unsupported;

#[cfg(target_os = "windows")]
pub(crate) use self::windows::Desktop;
#[cfg(not(target_os = "windows"))]
pub(crate) use self::unsupported::Desktop;
