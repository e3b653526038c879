/// Tray icon asset loading
///
/// Assets are looked up by file name, first under the install directory and
/// then in the working directory. A missing or undecodable file never fails
/// the caller: a blank placeholder of the requested size is returned instead.
use crate::config::{OsFamily, TrayConfig};
use crate::error::{Result, TrayError};
use std::path::{Path, PathBuf};

/// Tray icons are always square at this edge length
pub const ICON_SIZE: u32 = 16;

pub const ICON_ON: &str = "16on.png";
pub const ICON_OFF: &str = "16off.png";

/// Icon shown right after the tray is created
pub fn initial_icon_name(os: OsFamily) -> &'static str {
    match os {
        OsFamily::MacOs => ICON_OFF,
        OsFamily::Other => ICON_ON,
    }
}

/// Where a `TrayImage`'s pixels came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOrigin {
    File(PathBuf),
    Placeholder,
}

/// Decoded RGBA8 icon ready for the platform layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrayImage {
    rgba: Vec<u8>,
    width: u32,
    height: u32,
    origin: ImageOrigin,
}

impl TrayImage {
    /// Fully transparent image
    pub fn placeholder(width: u32, height: u32) -> Self {
        Self {
            rgba: vec![0; width as usize * height as usize * 4],
            width,
            height,
            origin: ImageOrigin::Placeholder,
        }
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn origin(&self) -> &ImageOrigin {
        &self.origin
    }

    pub fn is_placeholder(&self) -> bool {
        self.origin == ImageOrigin::Placeholder
    }
}

#[derive(Debug, Clone)]
pub struct IconLoader {
    install_dir: PathBuf,
    working_dir: PathBuf,
}

impl IconLoader {
    pub fn new(install_dir: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            install_dir: install_dir.into(),
            working_dir: working_dir.into(),
        }
    }

    /// Loader rooted at the process working directory
    pub fn from_config(config: &TrayConfig) -> Self {
        let working_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::new(config.install_dir.clone(), working_dir)
    }

    /// Install-relative candidate if it is a file, otherwise the
    /// working-directory candidate (which may not exist).
    pub fn resolve(&self, name: &str) -> PathBuf {
        let installed = self.working_dir.join(&self.install_dir).join(name);
        if installed.is_file() {
            installed
        } else {
            self.working_dir.join(name)
        }
    }

    /// Load `name` scaled to `width` x `height`, or a placeholder.
    pub fn load(&self, name: &str, width: u32, height: u32) -> TrayImage {
        let path = self.resolve(name);
        if !path.is_file() {
            tracing::error!("Still no icon file at: {}", path.display());
        }

        match decode(&path, width, height) {
            Ok(image) => image,
            Err(e) => {
                tracing::error!("Could not load icon file {}: {}", path.display(), e);
                TrayImage::placeholder(width, height)
            }
        }
    }
}

fn decode(path: &Path, width: u32, height: u32) -> Result<TrayImage> {
    let bytes = std::fs::read(path).map_err(|source| TrayError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let img = image::load_from_memory(&bytes).map_err(|source| TrayError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let img = img.resize_exact(width, height, image::imageops::FilterType::Lanczos3);

    Ok(TrayImage {
        rgba: img.to_rgba8().into_raw(),
        width,
        height,
        origin: ImageOrigin::File(path.to_path_buf()),
    })
}
