//! Handle for reaching the main UI thread from worker threads.

use crate::{AppError, AppResult, TrayCommand, tray_command::Reply};

use std::{
    panic::Location,
    sync::{Mutex, mpsc},
    time::Duration,
};

use error_location::ErrorLocation;
use tao::event_loop::EventLoopProxy;
use tracing::error;

/// How long a worker waits for the main thread to answer a request.
pub(crate) const REPLY_TIMEOUT: Duration = Duration::from_secs(2);

/// Sends [`TrayCommand`]s into the `tao` event loop.
pub struct MainThread {
    proxy: Mutex<EventLoopProxy<TrayCommand>>,
}

impl MainThread {
    pub fn new(proxy: EventLoopProxy<TrayCommand>) -> Self {
        Self {
            proxy: Mutex::new(proxy),
        }
    }

    /// Fire-and-forget delivery.
    #[track_caller]
    pub fn send(&self, command: TrayCommand) -> AppResult<()> {
        let proxy = self.proxy.lock().unwrap_or_else(|e| {
            error!("Event loop proxy mutex poisoned, recovering");
            e.into_inner()
        });

        proxy
            .send_event(command)
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Event loop closed: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    /// Send a command built around a reply channel and block until the main
    /// thread answers or [`REPLY_TIMEOUT`] elapses.
    ///
    /// Must not be called from the main thread itself.
    #[track_caller]
    pub fn request<T>(&self, build: impl FnOnce(Reply<T>) -> TrayCommand) -> AppResult<T> {
        let (reply_tx, reply_rx) = mpsc::channel();

        self.send(build(reply_tx))?;

        match reply_rx.recv_timeout(REPLY_TIMEOUT) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(reason)) => Err(AppError::HotkeyRegistrationFailed {
                reason,
                location: ErrorLocation::from(Location::caller()),
            }),
            Err(e) => Err(AppError::ChannelSendFailed {
                message: format!("No reply from main thread: {}", e),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
