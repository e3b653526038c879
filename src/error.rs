use std::path::PathBuf;
use thiserror::Error;

/// Failures inside the tray layer.
///
/// None of these reach callers of `SystemTray`; they are logged and the
/// tray degrades (placeholder icon, disabled tray).
#[derive(Debug, Error)]
pub enum TrayError {
    #[error("system tray is not available on this desktop")]
    Unsupported,

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode icon {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("platform tray error: {0}")]
    Platform(String),
}

pub type Result<T> = std::result::Result<T, TrayError>;
