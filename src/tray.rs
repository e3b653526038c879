/// System tray controller
///
/// `SystemTray` is the handle the rest of the process talks to. It is
/// `Send + Clone`, and every method returns immediately: widget work is
/// posted to the display and runs later on the UI thread against `TrayUi`.
///
/// `TrayUi` is the UI-thread half. It owns the platform backend, the menu
/// model and the observer registry, and turns platform events into actions.
use crate::backend::TrayBackend;
use crate::collaborators::Collaborators;
use crate::config::{OsFamily, TrayConfig};
use crate::display::DisplayHandle;
use crate::icon::{initial_icon_name, IconLoader, TrayImage, ICON_ON, ICON_SIZE};
use crate::listeners::{EventKind, ListenerRegistry, TrayAction, Widget};
use crate::menu::{ItemKind, MenuEntry, MenuModel};
use crate::update::UpdateInfo;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// What the event loop should do after an event was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit(i32),
}

/// State visible from both halves
struct Shared {
    config: TrayConfig,
    icons: IconLoader,
    collaborators: Collaborators,
    update: Mutex<Option<UpdateInfo>>,
}

#[derive(Clone)]
pub struct SystemTray {
    display: DisplayHandle,
    shared: Arc<Shared>,
}

pub struct TrayUi {
    display: DisplayHandle,
    shared: Arc<Shared>,
    backend: Box<dyn TrayBackend>,
    listeners: ListenerRegistry,
    menu: Option<MenuModel>,
    image: Option<TrayImage>,
    disposed: bool,
}

impl SystemTray {
    /// Split a tray into its thread-safe handle and its UI-thread state.
    /// Icons are looked up relative to the process working directory.
    pub fn new(
        display: DisplayHandle,
        backend: Box<dyn TrayBackend>,
        config: TrayConfig,
        collaborators: Collaborators,
    ) -> (SystemTray, TrayUi) {
        let icons = IconLoader::from_config(&config);
        Self::with_icons(display, backend, config, icons, collaborators)
    }

    pub fn with_icons(
        display: DisplayHandle,
        backend: Box<dyn TrayBackend>,
        config: TrayConfig,
        icons: IconLoader,
        collaborators: Collaborators,
    ) -> (SystemTray, TrayUi) {
        let shared = Arc::new(Shared {
            config,
            icons,
            collaborators,
            update: Mutex::new(None),
        });

        let tray = SystemTray {
            display: display.clone(),
            shared: Arc::clone(&shared),
        };
        let ui = TrayUi {
            display,
            shared,
            backend,
            listeners: ListenerRegistry::new(),
            menu: None,
            image: None,
            disposed: false,
        };
        (tray, ui)
    }

    /// Ask the UI thread to put the icon in the tray.
    pub fn create_tray(&self) {
        self.display.async_exec(|ui| ui.create_internal());
    }

    /// Swap the tray icon image.
    pub fn set_image(&self, image: TrayImage) {
        self.display.async_exec(move |ui| ui.apply_image(image));
    }

    /// Switch to the "on" icon. Only macOS starts with the "off" icon, so
    /// everywhere else this does nothing.
    pub fn activate(&self) {
        info!("Activating Lantern icon");
        if self.shared.config.os_family != OsFamily::MacOs {
            info!("Ignoring activation since we're not on OSX...");
            return;
        }
        let image = self.shared.icons.load(ICON_ON, ICON_SIZE, ICON_SIZE);
        self.set_image(image);
    }

    /// Record new update metadata and show (or relabel) the Update entry.
    pub fn add_update(&self, data: HashMap<String, String>) {
        let info = UpdateInfo::from(data);
        info!("Adding update data: {:?}", info);
        *self.shared.update.lock() = Some(info.clone());
        self.display.async_exec(move |ui| ui.show_update(&info));
    }

    /// Latest update snapshot, if any
    pub fn update_info(&self) -> Option<UpdateInfo> {
        self.shared.update.lock().clone()
    }
}

impl TrayUi {
    pub fn is_created(&self) -> bool {
        self.menu.is_some()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn menu(&self) -> Option<&MenuModel> {
        self.menu.as_ref()
    }

    /// Image currently applied to the tray icon
    pub fn image(&self) -> Option<&TrayImage> {
        self.image.as_ref()
    }

    pub fn listener(&self, widget: Widget, kind: EventKind) -> Option<TrayAction> {
        self.listeners.get(widget, kind)
    }

    fn create_internal(&mut self) {
        if self.disposed {
            return;
        }
        if self.is_created() {
            debug!("Tray already created");
            return;
        }
        if !self.backend.is_supported() {
            info!("The system tray is not available");
            return;
        }

        let menu = MenuModel::standard();
        if let Err(e) = self.backend.create(&self.shared.config.tooltip, &menu) {
            error!("Failed to create tray icon: {}", e);
            return;
        }
        self.menu = Some(menu);

        self.listeners.set(Widget::Tray, EventKind::Show, TrayAction::LogShown);
        self.listeners.set(Widget::Tray, EventKind::Hide, TrayAction::LogHidden);
        self.listeners.set(Widget::Tray, EventKind::MenuDetect, TrayAction::ShowMenu);
        self.listeners.set(
            Widget::Item(ItemKind::Configure),
            EventKind::Selection,
            TrayAction::Configure,
        );
        self.listeners.set(Widget::Item(ItemKind::Quit), EventKind::Selection, TrayAction::Quit);

        self.handle_event(Widget::Tray, EventKind::Show);

        let name = initial_icon_name(self.shared.config.os_family);
        let image = self.shared.icons.load(name, ICON_SIZE, ICON_SIZE);
        self.display.async_exec(move |ui| ui.apply_image(image));
    }

    fn apply_image(&mut self, image: TrayImage) {
        if !self.is_created() || self.disposed {
            debug!("No tray icon to set an image on");
            return;
        }
        match self.backend.set_image(&image) {
            Ok(()) => self.image = Some(image),
            Err(e) => error!("Failed to set tray image: {}", e),
        }
    }

    fn show_update(&mut self, info: &UpdateInfo) {
        let Some(menu) = self.menu.as_mut() else {
            warn!("Update data arrived before the tray was created, not showing it");
            return;
        };

        if !menu.contains(ItemKind::Update) {
            menu.insert(0, MenuEntry::new(ItemKind::Update, ""));
            self.listeners.set(
                Widget::Item(ItemKind::Update),
                EventKind::Selection,
                TrayAction::OpenUpdate,
            );
        }
        menu.set_label(ItemKind::Update, info.menu_label());

        if let Err(e) = self.backend.sync_menu(menu) {
            error!("Failed to update tray menu: {}", e);
        }
    }

    /// Fire whatever observer is registered for `kind` on `widget`.
    pub fn handle_event(&mut self, widget: Widget, kind: EventKind) -> Flow {
        if self.disposed {
            return Flow::Continue;
        }
        match self.listeners.get(widget, kind) {
            Some(action) => self.perform(action),
            None => {
                debug!("No listener for {:?} on {:?}", kind, widget);
                Flow::Continue
            }
        }
    }

    fn perform(&mut self, action: TrayAction) -> Flow {
        match action {
            TrayAction::LogShown => info!("show"),
            TrayAction::LogHidden => info!("hide"),
            TrayAction::ShowMenu => {
                info!("Setting menu visible");
                if let Err(e) = self.backend.show_menu() {
                    warn!("Failed to show tray menu: {}", e);
                }
            }
            TrayAction::Configure => {
                info!("Got config call");
                let launcher = (self.shared.collaborators.launcher)();
                launcher.install();
            }
            TrayAction::OpenUpdate => {
                info!("Got update call");
                let url = self
                    .shared
                    .update
                    .lock()
                    .as_ref()
                    .and_then(|u| u.url().map(str::to_owned));
                match url {
                    Some(url) => self.shared.collaborators.uri_opener.open(&url),
                    None => warn!("Update data has no url"),
                }
            }
            TrayAction::Quit => {
                info!("Got exit call");
                self.dispose();
                return Flow::Exit(0);
            }
        }
        Flow::Continue
    }

    /// Tear down the tray and the display. Nothing posted afterwards runs.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        if self.is_created() {
            self.handle_event(Widget::Tray, EventKind::Hide);
            self.backend.dispose();
        }
        self.listeners.clear();
        self.disposed = true;
        self.display.dispose();
    }

    /// Let the platform toolkit process its own events
    pub fn pump(&mut self) {
        if !self.disposed {
            self.backend.pump();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendCall, CallLog, HeadlessBackend};
    use crate::collaborators::{BrowserLauncher, UriOpener};
    use crate::display::Display;

    struct NoLauncher;
    impl BrowserLauncher for NoLauncher {
        fn install(&self) {}
    }

    struct NoOpener;
    impl UriOpener for NoOpener {
        fn open(&self, _uri: &str) {}
    }

    fn setup(supported: bool, os: OsFamily) -> (Display, SystemTray, TrayUi, CallLog) {
        let display = Display::headless();
        let (backend, calls_log) = HeadlessBackend::new(supported);
        let config = TrayConfig {
            os_family: os,
            ..TrayConfig::default()
        };
        let dir = std::env::temp_dir().join("lantern-tray-no-icons");
        let collaborators = Collaborators::new(
            Arc::new(|| Box::new(NoLauncher) as Box<dyn BrowserLauncher>),
            Arc::new(NoOpener),
        );
        let (tray, ui) = SystemTray::with_icons(
            display.handle(),
            Box::new(backend),
            config,
            IconLoader::new("install/common", dir),
            collaborators,
        );
        (display, tray, ui, calls_log)
    }

    #[test]
    fn test_create_is_deferred_until_drained() {
        let (display, tray, mut ui, calls_log) = setup(true, OsFamily::Other);

        tray.create_tray();
        assert!(!ui.is_created());
        assert_eq!(calls_log.count(), 0);

        display.run_pending(&mut ui);
        assert!(ui.is_created());
        assert_eq!(
            calls_log.menu_labels(),
            Some(vec!["Configure".to_string(), "".to_string(), "Quit".to_string()])
        );
        assert_eq!(ui.listener(Widget::Tray, EventKind::MenuDetect), Some(TrayAction::ShowMenu));
        assert!(ui.image().is_some_and(|i| i.is_placeholder()));
    }

    #[test]
    fn test_create_twice_keeps_one_tray() {
        let (display, tray, mut ui, calls_log) = setup(true, OsFamily::Other);

        tray.create_tray();
        tray.create_tray();
        display.run_pending(&mut ui);

        let creates = calls_log
            .calls()
            .iter()
            .filter(|c| matches!(c, BackendCall::Create { .. }))
            .count();
        assert_eq!(creates, 1);
    }

    #[test]
    fn test_menu_detect_shows_menu() {
        let (display, tray, mut ui, calls_log) = setup(true, OsFamily::Other);
        tray.create_tray();
        display.run_pending(&mut ui);

        assert_eq!(ui.handle_event(Widget::Tray, EventKind::MenuDetect), Flow::Continue);
        assert_eq!(calls_log.calls().last(), Some(&BackendCall::ShowMenu));
    }

    #[test]
    fn test_update_before_create_is_ignored() {
        let (display, tray, mut ui, _calls_log) = setup(true, OsFamily::Other);

        tray.add_update(HashMap::from([("version".to_string(), "1.0".to_string())]));
        tray.create_tray();
        display.run_pending(&mut ui);

        assert!(!ui.menu().unwrap().contains(ItemKind::Update));
        assert!(tray.update_info().is_some());
    }
}
