//! System tray icon and context menu.
//!
//! The menu carries a disabled "Current Hotkey" label followed by the
//! actionable entries. [`TrayProxy`] is the `Send` side the core talks to;
//! it forwards label updates and teardown to the main thread.

use crate::{AppError, AppResult, MainThread, TrayCommand};

use std::{panic::Location, sync::Arc};

use cursor_lock_core::{Command, CoreResult, HotkeyBinding, LockError, TraySurface};
use error_location::ErrorLocation;
use image::{Rgba, RgbaImage};
use tracing::{info, instrument, warn};
use tray_icon::menu::{Menu, MenuId, MenuItem, PredefinedMenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

/// Tooltip shown when hovering the tray icon.
pub const TOOLTIP: &str = "Cursor Lock to Window";

const ICON_SIZE: u32 = 64;
const ICON_BORDER: u32 = 4;
const ICON_FILL: Rgba<u8> = Rgba([70, 130, 180, 255]);
const ICON_EDGE: Rgba<u8> = Rgba([35, 65, 90, 255]);

/// Text of the non-actionable label for `binding`.
pub fn hotkey_label(binding: &str) -> String {
    format!("Current Hotkey: {}", binding)
}

/// Menu entry ids mapped to coordinator commands.
#[derive(Debug, Clone)]
pub struct MenuCommands {
    set_hotkey: MenuId,
    toggle_lock: MenuId,
    force_unlock: MenuId,
    exit: MenuId,
}

impl MenuCommands {
    /// Command behind a clicked menu entry. The label entry has none.
    pub fn command_for(&self, id: &MenuId) -> Option<Command> {
        if *id == self.set_hotkey {
            Some(Command::SetNewHotkey)
        } else if *id == self.toggle_lock {
            Some(Command::ToggleLock)
        } else if *id == self.force_unlock {
            Some(Command::ForceUnlock)
        } else if *id == self.exit {
            Some(Command::Exit)
        } else {
            None
        }
    }
}

/// System tray icon manager. Main thread only.
pub struct TrayManager {
    _tray_icon: TrayIcon,
    hotkey_item: MenuItem,
    commands: MenuCommands,
}

impl TrayManager {
    /// Build the icon and menu showing `binding` as the current hotkey.
    #[track_caller]
    #[instrument]
    pub fn new(binding: &str) -> AppResult<Self> {
        let menu = Menu::new();

        let hotkey_item = MenuItem::new(hotkey_label(binding), false, None);
        let set_hotkey_item = MenuItem::new("Set New Hotkey", true, None);
        let toggle_item = MenuItem::new("Toggle Lock", true, None);
        let force_unlock_item = MenuItem::new("Force Unlock", true, None);
        let exit_item = MenuItem::new("Exit", true, None);

        let commands = MenuCommands {
            set_hotkey: set_hotkey_item.id().clone(),
            toggle_lock: toggle_item.id().clone(),
            force_unlock: force_unlock_item.id().clone(),
            exit: exit_item.id().clone(),
        };

        let separator = PredefinedMenuItem::separator();
        menu.append_items(&[
            &hotkey_item,
            &set_hotkey_item,
            &toggle_item,
            &force_unlock_item,
            &separator,
            &exit_item,
        ])
        .map_err(|e| AppError::TrayError {
            reason: format!("Failed to build tray menu: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let tray_icon = TrayIconBuilder::new()
            .with_tooltip(TOOLTIP)
            .with_menu(Box::new(menu))
            .with_icon(Self::load_icon()?)
            .build()
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to create tray icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!("System tray icon initialized");

        Ok(Self {
            _tray_icon: tray_icon,
            hotkey_item,
            commands,
        })
    }

    /// Refresh the "Current Hotkey" label.
    pub fn set_hotkey_label(&self, binding: &str) {
        self.hotkey_item.set_text(hotkey_label(binding));
    }

    /// Menu ids for routing clicks.
    pub fn commands(&self) -> MenuCommands {
        self.commands.clone()
    }

    /// Render the icon in memory: a filled square with a darker edge.
    #[track_caller]
    fn load_icon() -> AppResult<Icon> {
        let inner = ICON_BORDER..ICON_SIZE - ICON_BORDER;
        let rgba = RgbaImage::from_fn(ICON_SIZE, ICON_SIZE, |x, y| {
            if inner.contains(&x) && inner.contains(&y) {
                ICON_FILL
            } else {
                ICON_EDGE
            }
        });

        Icon::from_rgba(rgba.into_raw(), ICON_SIZE, ICON_SIZE).map_err(|e| AppError::TrayError {
            reason: format!("Failed to create icon from RGBA: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

/// [`TraySurface`] that forwards to the main thread.
pub struct TrayProxy {
    main_thread: Arc<MainThread>,
}

impl TrayProxy {
    pub fn new(main_thread: Arc<MainThread>) -> Self {
        Self { main_thread }
    }
}

impl TraySurface for TrayProxy {
    fn set_hotkey_label(&self, binding: &HotkeyBinding) {
        if let Err(e) = self
            .main_thread
            .send(TrayCommand::SetHotkeyLabel(binding.to_string()))
        {
            warn!(error = %e, "Failed to refresh hotkey label");
        }
    }

    #[track_caller]
    fn detach(&self) -> CoreResult<()> {
        self.main_thread
            .send(TrayCommand::Detach)
            .map_err(|e| LockError::TrayUnavailable {
                reason: e.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
