/// Desktop tray backed by the `tray-icon` crate
use super::TrayBackend;
use crate::error::{Result, TrayError};
use crate::icon::TrayImage;
use crate::menu::{ItemKind, MenuModel};
use std::collections::HashMap;
use tray_icon::menu::{Menu, MenuItem, PredefinedMenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

pub struct NativeBackend {
    tray_icon: Option<TrayIcon>,
    menu: Menu,
    items: HashMap<ItemKind, MenuItem>,
    separators: Vec<PredefinedMenuItem>,
    supported: Option<bool>,
}

impl Default for NativeBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeBackend {
    pub fn new() -> Self {
        Self {
            tray_icon: None,
            menu: Menu::new(),
            items: HashMap::new(),
            separators: Vec::new(),
            supported: None,
        }
    }

    fn platform(e: impl std::fmt::Display) -> TrayError {
        TrayError::Platform(e.to_string())
    }
}

#[cfg(target_os = "linux")]
fn detect_support() -> bool {
    match gtk::init() {
        Ok(()) => true,
        Err(e) => {
            tracing::info!("GTK unavailable, no tray: {}", e);
            false
        }
    }
}

#[cfg(not(target_os = "linux"))]
fn detect_support() -> bool {
    true
}

type NativeMenu = (Menu, HashMap<ItemKind, MenuItem>, Vec<PredefinedMenuItem>);

/// Build the platform menu for `model`. Nothing is kept if any append fails.
fn build_menu(model: &MenuModel) -> Result<NativeMenu> {
    let menu = Menu::new();
    let mut items = HashMap::new();
    let mut separators = Vec::new();

    for entry in model.entries() {
        if entry.kind == ItemKind::Separator {
            let separator = PredefinedMenuItem::separator();
            menu.append(&separator).map_err(NativeBackend::platform)?;
            separators.push(separator);
        } else {
            let item = MenuItem::with_id(entry.kind.id(), &entry.label, true, None);
            menu.append(&item).map_err(NativeBackend::platform)?;
            items.insert(entry.kind, item);
        }
    }
    Ok((menu, items, separators))
}

impl TrayBackend for NativeBackend {
    fn is_supported(&mut self) -> bool {
        *self.supported.get_or_insert_with(detect_support)
    }

    fn create(&mut self, tooltip: &str, menu: &MenuModel) -> Result<()> {
        if !self.is_supported() {
            return Err(TrayError::Unsupported);
        }

        let (native_menu, items, separators) = build_menu(menu)?;

        let tray_icon = TrayIconBuilder::new()
            .with_tooltip(tooltip)
            .with_menu(Box::new(native_menu.clone()))
            .build()
            .map_err(|e| TrayError::Platform(format!("Failed to create tray icon: {}", e)))?;

        self.menu = native_menu;
        self.items = items;
        self.separators = separators;
        self.tray_icon = Some(tray_icon);
        Ok(())
    }

    fn set_image(&mut self, image: &TrayImage) -> Result<()> {
        let Some(tray_icon) = self.tray_icon.as_ref() else {
            return Err(TrayError::Platform("tray icon not created".to_string()));
        };

        let icon = Icon::from_rgba(image.rgba().to_vec(), image.width(), image.height())
            .map_err(|e| TrayError::Platform(format!("Failed to create icon: {:?}", e)))?;
        tray_icon.set_icon(Some(icon)).map_err(Self::platform)
    }

    fn sync_menu(&mut self, menu: &MenuModel) -> Result<()> {
        for (position, entry) in menu.entries().iter().enumerate() {
            if entry.kind == ItemKind::Separator {
                continue;
            }

            match self.items.get(&entry.kind) {
                Some(item) => {
                    if item.text() != entry.label {
                        item.set_text(&entry.label);
                    }
                }
                None => {
                    let item = MenuItem::with_id(entry.kind.id(), &entry.label, true, None);
                    self.menu.insert(&item, position).map_err(Self::platform)?;
                    self.items.insert(entry.kind, item);
                }
            }
        }
        Ok(())
    }

    fn show_menu(&mut self) -> Result<()> {
        // The platform pops the attached menu on its own gesture; re-attaching
        // makes sure the latest entries are what it shows.
        let Some(tray_icon) = self.tray_icon.as_ref() else {
            return Err(TrayError::Platform("tray icon not created".to_string()));
        };
        tray_icon.set_menu(Some(Box::new(self.menu.clone())));
        Ok(())
    }

    fn dispose(&mut self) {
        // Dropping the TrayIcon removes it from the notification area
        self.tray_icon = None;
        self.items.clear();
        self.separators.clear();
    }

    #[cfg(target_os = "linux")]
    fn pump(&mut self) {
        if self.supported != Some(true) {
            return;
        }
        while gtk::events_pending() {
            gtk::main_iteration_do(false);
        }
    }
}
