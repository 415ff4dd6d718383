use crate::{AppCommand, AppResult, MainThread, TrayCommand, tray_manager::MenuCommands};

use std::{sync::Arc, time::Duration};

use cursor_lock_core::{Command, Coordinator, Flow, HotkeyBinding};
use tokio::sync::{mpsc, watch};
use tracing::{error, info, instrument, warn};
use tray_icon::menu::MenuEvent;

/// Main application state.
///
/// Runs on the async runtime thread. Every coordinator call may block (it
/// waits on the main thread for hotkey registration, or on the clamp loop
/// during a force unlock), so each one goes through `spawn_blocking`.
pub struct App {
    pub(crate) coordinator: Coordinator,
    pub(crate) initial_binding: HotkeyBinding,
    pub(crate) main_thread: Arc<MainThread>,
    pub(crate) menu: MenuCommands,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
}

impl App {
    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Cursor Lock starting");

        let coordinator = self.coordinator.clone();
        let binding = self.initial_binding.clone();
        match tokio::task::spawn_blocking(move || coordinator.start(binding)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "Running without a global hotkey"),
            Err(e) => error!(error = ?e, "Startup task panicked"),
        }

        // MenuEvent::receiver() is a crossbeam receiver with a blocking
        // recv(). When tray_event_rx is dropped the next blocking_send()
        // fails and the task ends.
        let (tray_event_tx, mut tray_event_rx) = mpsc::channel(32);
        let tray_handle = tokio::task::spawn_blocking(move || {
            let receiver = MenuEvent::receiver();
            while let Ok(event) = receiver.recv() {
                if tray_event_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                Some(event) = tray_event_rx.recv() => {
                    if let Some(command) = self.menu.command_for(&event.id) {
                        if self.dispatch(command).await == Flow::Exit {
                            break;
                        }
                    }
                }

                Some(cmd) = self.command_rx.recv() => {
                    match cmd {
                        AppCommand::HotkeyPressed => self.hotkey_pressed().await,
                    }
                }

                result = &mut ctrl_c => {
                    if let Err(e) = result {
                        error!(error = %e, "Failed to listen for Ctrl+C");
                    }
                    info!("Interrupted, shutting down");
                    self.dispatch(Command::Exit).await;
                    break;
                }

                else => {
                    info!("All channels closed, shutting down");
                    self.dispatch(Command::Exit).await;
                    break;
                }
            }
        }

        drop(tray_event_rx);

        match tokio::time::timeout(Duration::from_secs(1), tray_handle).await {
            Ok(Ok(())) => info!("Tray event forwarder stopped cleanly"),
            Ok(Err(e)) => error!(error = ?e, "Tray event forwarder task panicked"),
            Err(_) => info!(
                "Tray event forwarder did not stop within timeout, \
                     will be cleaned up on exit"
            ),
        }

        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.main_thread.send(TrayCommand::Shutdown) {
            error!(error = %e, "Failed to stop the event loop");
        }

        info!("Cursor Lock shut down successfully");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn dispatch(&self, command: Command) -> Flow {
        let coordinator = self.coordinator.clone();
        match tokio::task::spawn_blocking(move || coordinator.dispatch(command)).await {
            Ok(flow) => flow,
            Err(e) => {
                error!(error = ?e, "Command task panicked");
                if command == Command::Exit {
                    Flow::Exit
                } else {
                    Flow::Continue
                }
            }
        }
    }

    async fn hotkey_pressed(&self) {
        let coordinator = self.coordinator.clone();
        if let Err(e) = tokio::task::spawn_blocking(move || coordinator.on_hotkey_pressed()).await {
            error!(error = ?e, "Hotkey task panicked");
        }
    }
}
