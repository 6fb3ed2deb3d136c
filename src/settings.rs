use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::Result;

const SETTINGS_DIR: &str = "scanerr";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PersistentSettings {
    pub api_key: Option<String>,
    pub api_root: Option<String>,
}

/// Per-field result of `scanerr check`.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsCheck {
    pub file_exists: bool,
    pub api_key_present: bool,
    pub api_root_present: bool,
}

impl SettingsCheck {
    pub fn passed(&self) -> bool {
        self.file_exists && self.api_key_present && self.api_root_present
    }
}

pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(SETTINGS_DIR)
        .join(SETTINGS_FILE)
}

pub fn load_settings(path: &Path) -> PersistentSettings {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!("Ignoring unreadable settings file {:?}: {}", path, e);
            PersistentSettings::default()
        }),
        Err(_) => {
            debug!("No settings file at {:?}", path);
            PersistentSettings::default()
        }
    }
}

pub fn save_settings(path: &Path, settings: &PersistentSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn check_settings(path: &Path) -> SettingsCheck {
    let file_exists = path.exists();
    let settings = load_settings(path);
    let non_empty = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.trim().is_empty());

    SettingsCheck {
        file_exists,
        api_key_present: non_empty(&settings.api_key),
        api_root_present: non_empty(&settings.api_root),
    }
}
