use super::TrayBackend;
use crate::error::{Result, TrayError};
use crate::icon::TrayImage;
use crate::menu::MenuModel;
use std::cell::RefCell;
use std::rc::Rc;

/// A call the tray made into the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Create { tooltip: String, labels: Vec<String> },
    SetImage(TrayImage),
    SyncMenu(Vec<String>),
    ShowMenu,
    Dispose,
}

/// Backend without a desktop: records every call instead of drawing.
///
/// Only the test suites construct it; the binary always runs `NativeBackend`.
pub struct HeadlessBackend {
    supported: bool,
    calls: Rc<RefCell<Vec<BackendCall>>>,
}

/// Read side of a `HeadlessBackend`'s call log
#[derive(Clone)]
pub struct CallLog {
    calls: Rc<RefCell<Vec<BackendCall>>>,
}

impl HeadlessBackend {
    pub fn new(supported: bool) -> (Self, CallLog) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let calls_log = CallLog {
            calls: Rc::clone(&calls),
        };
        (Self { supported, calls }, calls_log)
    }

    fn record(&self, call: BackendCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl CallLog {
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.borrow().clone()
    }

    pub fn count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Last image handed to `set_image`
    pub fn last_image(&self) -> Option<TrayImage> {
        self.calls.borrow().iter().rev().find_map(|c| match c {
            BackendCall::SetImage(image) => Some(image.clone()),
            _ => None,
        })
    }

    /// Menu labels as of the latest create/sync
    pub fn menu_labels(&self) -> Option<Vec<String>> {
        self.calls.borrow().iter().rev().find_map(|c| match c {
            BackendCall::Create { labels, .. } | BackendCall::SyncMenu(labels) => Some(labels.clone()),
            _ => None,
        })
    }
}

impl TrayBackend for HeadlessBackend {
    fn is_supported(&mut self) -> bool {
        self.supported
    }

    fn create(&mut self, tooltip: &str, menu: &MenuModel) -> Result<()> {
        if !self.supported {
            return Err(TrayError::Unsupported);
        }
        self.record(BackendCall::Create {
            tooltip: tooltip.to_string(),
            labels: menu.labels(),
        });
        Ok(())
    }

    fn set_image(&mut self, image: &TrayImage) -> Result<()> {
        self.record(BackendCall::SetImage(image.clone()));
        Ok(())
    }

    fn sync_menu(&mut self, menu: &MenuModel) -> Result<()> {
        self.record(BackendCall::SyncMenu(menu.labels()));
        Ok(())
    }

    fn show_menu(&mut self) -> Result<()> {
        self.record(BackendCall::ShowMenu);
        Ok(())
    }

    fn dispose(&mut self) {
        self.record(BackendCall::Dispose);
    }
}
