//! Platform tray seam.
//!
//! A backend is created and used only on the UI thread, so implementations
//! are free to hold non-`Send` toolkit handles.

mod headless;
mod native;

pub use headless::{BackendCall, CallLog, HeadlessBackend};
pub use native::NativeBackend;

use crate::error::Result;
use crate::icon::TrayImage;
use crate::menu::MenuModel;

pub trait TrayBackend {
    /// Whether the desktop offers a tray at all
    fn is_supported(&mut self) -> bool;

    /// Allocate the tray slot with the popup menu attached
    fn create(&mut self, tooltip: &str, menu: &MenuModel) -> Result<()>;

    fn set_image(&mut self, image: &TrayImage) -> Result<()>;

    /// Bring the platform menu in line with `menu` (new entries, labels)
    fn sync_menu(&mut self, menu: &MenuModel) -> Result<()>;

    /// Make the popup menu visible
    fn show_menu(&mut self) -> Result<()>;

    /// Release the tray slot and menu
    fn dispose(&mut self);

    /// Give the toolkit a chance to process its own events
    fn pump(&mut self) {}
}
