#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
//! Cursor Lock: confine the mouse cursor to one window, toggled by a global hotkey.

mod app;
mod app_command;
mod config;
mod desktop;
mod error;
mod hotkey_handler;
mod keyboard_hook;
mod main_thread;
mod notifier;
mod single_instance;
#[cfg(test)]
mod tests;
mod tray_command;
mod tray_manager;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
    hotkey_handler::{HotkeyHandler, HotkeyHost, HotkeyRegistrar},
    main_thread::MainThread,
    notifier::ToastNotifier,
    tray_command::TrayCommand,
    tray_manager::{TrayManager, TrayProxy},
};

use crate::{
    config::{Config, ConfigStore},
    desktop::Desktop,
    keyboard_hook::LowLevelKeyboardHook,
};

use std::sync::Arc;

use cursor_lock_core::{Coordinator, Platform};
use tao::{
    event::{Event, StartCause},
    event_loop::{ControlFlow, EventLoopBuilder},
};
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_LOG_FILTER: &str = "cursor_lock=debug,cursor_lock_core=debug";

/// Console output plus a daily rolling file under the data directory.
///
/// The returned guard flushes the file writer and must live until exit.
fn init_tracing() -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match Config::log_dir() {
        Ok(log_dir) => {
            let appender = tracing_appender::rolling::daily(log_dir, "cursor-lock.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        Err(e) => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
            warn!(error = %e, "File logging disabled");
            None
        }
    }
}

/// Application entry point.
fn main() {
    let log_guard = init_tracing();

    let instance_guard = match single_instance::acquire() {
        Ok(Some(guard)) => guard,
        Ok(None) => {
            info!("Another instance is already running");
            std::process::exit(0);
        }
        Err(e) => {
            error!("Failed to check for a running instance: {:?}", e);
            std::process::exit(1);
        }
    };

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let initial_binding = match config.hotkey.binding() {
        Ok(binding) => binding,
        Err(e) => {
            error!("No usable hotkey binding: {:?}", e);
            std::process::exit(1);
        }
    };

    let event_loop = EventLoopBuilder::<TrayCommand>::with_user_event().build();
    let main_thread = Arc::new(MainThread::new(event_loop.create_proxy()));

    // TrayManager lives on the main thread - TrayIcon is !Send on all platforms.
    // Dropping it removes the icon.
    let mut tray_manager = match TrayManager::new(initial_binding.as_str()) {
        Ok(tm) => Some(tm),
        Err(e) => {
            error!("Failed to create TrayManager: {:?}", e);
            std::process::exit(1);
        }
    };
    let menu = tray_manager.as_ref().map(TrayManager::commands);

    // Persists across event loop iterations; dropping it unregisters hotkeys.
    let mut hotkey_host: Option<HotkeyHost> = None;
    let mut startup = Some((config, initial_binding, menu));

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::UserEvent(cmd) => match cmd {
                TrayCommand::SetHotkeyLabel(label) => {
                    if let Some(tray) = tray_manager.as_ref() {
                        tray.set_hotkey_label(&label);
                    }
                }
                TrayCommand::RegisterHotkey { .. } | TrayCommand::UnregisterHotkey { .. } => {
                    match hotkey_host.as_ref() {
                        Some(host) => host.handle(cmd),
                        None => warn!("Hotkey request before the manager exists"),
                    }
                }
                TrayCommand::Detach => {
                    if tray_manager.take().is_some() {
                        info!("Tray icon removed");
                    }
                }
                TrayCommand::Shutdown => {
                    *control_flow = ControlFlow::ExitWithCode(0);
                }
            },
            Event::NewEvents(StartCause::Init) => {
                let Some((config, initial_binding, Some(menu))) = startup.take() else {
                    return;
                };

                // Register hotkeys on the main thread: tao's event loop pumps
                // the Windows messages needed for WM_HOTKEY delivery.
                hotkey_host = match HotkeyHost::new() {
                    Ok(host) => Some(host),
                    Err(e) => {
                        error!("Failed to create hotkey manager: {:?}", e);
                        std::process::exit(1);
                    }
                };

                let notifier = match ToastNotifier::spawn(&config.notifications) {
                    Ok(n) => Arc::new(n),
                    Err(e) => {
                        error!("Failed to start notifier: {:?}", e);
                        std::process::exit(1);
                    }
                };

                let desktop = Arc::new(Desktop::new());
                let registrar = Arc::new(HotkeyRegistrar::new(Arc::clone(&main_thread)));
                let timing = config.lock.timing();

                let platform = Platform {
                    windows: desktop.clone(),
                    clamp: desktop,
                    hotkeys: registrar.clone(),
                    keyboard: Arc::new(LowLevelKeyboardHook::new()),
                    notifier,
                    tray: Arc::new(TrayProxy::new(Arc::clone(&main_thread))),
                    settings: Arc::new(ConfigStore::new(config)),
                };
                let coordinator = Coordinator::new(platform, timing);

                let main_thread = Arc::clone(&main_thread);

                // Spawn tokio runtime on separate thread.
                // TrayManager and hotkey_host stay on the main thread.
                std::thread::spawn(move || {
                    let rt = match tokio::runtime::Runtime::new() {
                        Ok(rt) => rt,
                        Err(e) => {
                            error!("Failed to create tokio runtime: {:?}", e);
                            std::process::exit(1);
                        }
                    };

                    rt.block_on(async {
                        let (command_tx, command_rx) = mpsc::channel(32);
                        let (shutdown_tx, shutdown_rx) = watch::channel(false);
                        let hotkey_handler = HotkeyHandler::new(registrar, command_tx);

                        let app = App {
                            coordinator,
                            initial_binding,
                            main_thread,
                            menu,
                            command_rx,
                            shutdown_tx,
                        };

                        tokio::join!(
                            async {
                                if let Err(e) = hotkey_handler.run(shutdown_rx).await {
                                    error!(error = ?e, "Hotkey handler error");
                                }
                            },
                            async {
                                if let Err(e) = app.run().await {
                                    error!(error = ?e, "App error");
                                }
                            }
                        );
                    });
                });
            }
            _ => {}
        }

        // Keep the guards alive in the closure for the app's lifetime.
        let _ = (&log_guard, &instance_guard);
    });
}
