//! Named-mutex guard so only one copy of the program runs.

/// Name of the system-wide mutex held for the life of the process.
pub const MUTEX_NAME: &str = "CursorLockerMutex";

#[cfg(target_os = "windows")]
mod imp {
    use crate::{AppError, AppResult};

    use std::panic::Location;

    use error_location::ErrorLocation;
    use tracing::warn;
    use windows::{
        Win32::{
            Foundation::{CloseHandle, ERROR_ALREADY_EXISTS, GetLastError, HANDLE},
            System::Threading::CreateMutexW,
        },
        core::HSTRING,
    };

    /// Holds the named mutex; dropping it lets another instance start.
    pub struct InstanceGuard {
        handle: HANDLE,
    }

    /// Take the mutex. `Ok(None)` means another instance already holds it.
    #[track_caller]
    pub fn acquire() -> AppResult<Option<InstanceGuard>> {
        let name = HSTRING::from(super::MUTEX_NAME);

        // SAFETY: name outlives the call; default security attributes.
        let handle = unsafe { CreateMutexW(None, false, &name) }.map_err(|e| {
            AppError::SingleInstance {
                reason: format!("CreateMutexW failed: {}", e),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        // SAFETY: reads the calling thread's last-error value.
        if unsafe { GetLastError() } == ERROR_ALREADY_EXISTS {
            // SAFETY: handle was just returned by CreateMutexW.
            if let Err(e) = unsafe { CloseHandle(handle) } {
                warn!(error = %e, "Failed to close duplicate mutex handle");
            }
            return Ok(None);
        }

        Ok(Some(InstanceGuard { handle }))
    }

    impl Drop for InstanceGuard {
        fn drop(&mut self) {
            // SAFETY: handle is owned by this guard.
            if let Err(e) = unsafe { CloseHandle(self.handle) } {
                warn!(error = %e, "Failed to release instance mutex");
            }
        }
    }
}

#[cfg(not(target_os = "windows"))]
mod imp {
    use crate::AppResult;

    /// No system-wide guard on this platform.
    pub struct InstanceGuard;

    /// Always succeeds.
    pub fn acquire() -> AppResult<Option<InstanceGuard>> {
        Ok(Some(InstanceGuard))
    }
}

pub(crate) use imp::acquire;
