/// Update metadata handed to the tray by the host process
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const UPDATE_VERSION_KEY: &str = "version";
pub const UPDATE_URL_KEY: &str = "url";

/// Latest snapshot of update key/value pairs. No history is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpdateInfo(HashMap<String, String>);

impl UpdateInfo {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn version(&self) -> Option<&str> {
        self.get(UPDATE_VERSION_KEY)
    }

    pub fn url(&self) -> Option<&str> {
        self.get(UPDATE_URL_KEY)
    }

    pub fn into_map(self) -> HashMap<String, String> {
        self.0
    }

    /// Text of the Update menu entry
    pub fn menu_label(&self) -> String {
        match self.version() {
            Some(version) => format!("Update to Lantern {}", version),
            None => "Update to Lantern".to_string(),
        }
    }
}

impl From<HashMap<String, String>> for UpdateInfo {
    fn from(data: HashMap<String, String>) -> Self {
        Self(data)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for UpdateInfo {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Read `update.json` (a flat string map) from `dir`, if present
pub fn load_update_file(dir: &Path) -> Result<Option<UpdateInfo>> {
    let path = dir.join("update.json");
    if !path.is_file() {
        return Ok(None);
    }

    let contents =
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    let info = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    Ok(Some(info))
}
