/// Configuration module for the Lantern tray.
///
/// Settings are read (never written) from `config.json` in the
/// platform-specific data directory (%APPDATA%/Lantern/ on Windows,
/// ~/.local/share/lantern/ on Linux). Any field missing from the file falls
/// back to its default, and a missing or malformed file yields the defaults.
///
/// # Example
///
/// ```no_run
/// use lantern_tray::config::load_config;
///
/// let config = load_config();
/// assert_eq!(config.tooltip, "Lantern");
/// ```
use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// OS family as far as the tray cares: macOS gets the "off" icon until
/// activated, everything else shows the "on" icon from the start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    MacOs,
    Other,
}

impl OsFamily {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            OsFamily::MacOs
        } else {
            OsFamily::Other
        }
    }
}

impl Default for OsFamily {
    fn default() -> Self {
        OsFamily::current()
    }
}

/// Tray configuration
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct TrayConfig {
    /// Tooltip shown when hovering the tray icon
    pub tooltip: String,
    /// Directory checked first for icon assets, relative to the working directory
    pub install_dir: PathBuf,
    /// Max tracing level for the binary (trace, debug, info, warn, error)
    pub log_level: String,
    /// Page opened by the Configure menu entry
    pub configure_url: String,
    #[serde(skip)]
    pub os_family: OsFamily,
}

impl Default for TrayConfig {
    fn default() -> Self {
        TrayConfig {
            tooltip: "Lantern".to_string(),
            install_dir: PathBuf::from("install/common"),
            log_level: "info".to_string(),
            configure_url: "http://127.0.0.1:8383/".to_string(),
            os_family: OsFamily::current(),
        }
    }
}

impl TrayConfig {
    /// Parsed `log_level`, falling back to INFO on garbage.
    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}

/// Get the application's data directory
/// Creates directory if it doesn't exist
pub fn get_data_directory() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from("org", "Lantern", "Lantern")
        .ok_or_else(|| anyhow!("Failed to determine user data directory"))?;

    let data_dir = project_dirs.data_dir();

    fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

    Ok(data_dir.to_path_buf())
}

/// Load tray configuration from config.json
/// Returns default config if file doesn't exist or on error
pub fn load_config() -> TrayConfig {
    let Ok(data_dir) = get_data_directory() else {
        return TrayConfig::default();
    };

    load_config_from(&data_dir)
}

/// Load `config.json` from an explicit directory
pub fn load_config_from(dir: &Path) -> TrayConfig {
    let config_path = dir.join("config.json");

    if !config_path.exists() {
        return TrayConfig::default();
    }

    let Ok(contents) = fs::read_to_string(&config_path) else {
        return TrayConfig::default();
    };

    match serde_json::from_str(&contents) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring malformed {}: {}", config_path.display(), e);
            TrayConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TrayConfig::default();
        assert_eq!(config.tooltip, "Lantern");
        assert_eq!(config.install_dir, PathBuf::from("install/common"));
        assert_eq!(config.tracing_level(), tracing::Level::INFO);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.json"), r#"{"tooltip":"Lantern Beta"}"#).unwrap();

        let config = load_config_from(dir.path());
        assert_eq!(config.tooltip, "Lantern Beta");
        assert_eq!(config.install_dir, PathBuf::from("install/common"));
    }

    #[test]
    fn test_icon_size_is_not_configurable() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("config.json"),
            r#"{"tooltip":"Lantern Big","icon_size":40000}"#,
        )
        .unwrap();

        let config = load_config_from(dir.path());
        assert_eq!(config.tooltip, "Lantern Big");
        let json = serde_json::to_value(&config).unwrap();
        assert!(json.get("icon_size").is_none());
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.json"), "{ not json").unwrap();

        let config = load_config_from(dir.path());
        assert_eq!(config.tooltip, "Lantern");
    }

    #[test]
    fn test_bad_log_level() {
        let config = TrayConfig {
            log_level: "loud".to_string(),
            ..TrayConfig::default()
        };
        assert_eq!(config.tracing_level(), tracing::Level::INFO);
    }
}
