//! Lantern Tray Library
//!
//! System tray icon and popup menu for the Lantern background process.
//!
//! Architecture:
//! - `display` owns the UI-thread task queue; any thread may post work to it
//! - `tray` holds the thread-safe `SystemTray` entry points and the
//!   UI-thread `TrayUi` state they mutate
//! - `backend` is the platform seam (tray-icon, or headless for tests)
//! - `event_loop` drives everything from a winit loop

pub mod backend;
pub mod collaborators;
pub mod config;
pub mod display;
pub mod error;
pub mod event_loop;
pub mod icon;
pub mod listeners;
pub mod menu;
pub mod tray;
pub mod update;

pub use collaborators::{BrowserLauncher, Collaborators, UriOpener};
pub use config::{OsFamily, TrayConfig};
pub use display::{Display, DisplayHandle};
pub use error::TrayError;
pub use tray::{Flow, SystemTray, TrayUi};
pub use update::UpdateInfo;
