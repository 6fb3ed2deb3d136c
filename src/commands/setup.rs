use std::path::Path;

use crate::config::{ClientConfig, DEFAULT_API_ROOT};
use crate::output;
use crate::settings::{check_settings, load_settings, save_settings, PersistentSettings};

/// `scanerr config`: validate and store the credentials.
pub fn configure(path: &Path, api_key: &str, api_root: Option<&str>) -> anyhow::Result<bool> {
    let api_root = api_root.unwrap_or(DEFAULT_API_ROOT);
    // Refuse to store something no request could be built from.
    ClientConfig::new(api_root, api_key)?;

    let settings = PersistentSettings {
        api_key: Some(api_key.trim().to_string()),
        api_root: Some(api_root.trim().to_string()),
    };
    save_settings(path, &settings)?;

    output::success(&format!("Configs have been updated ({})", path.display()));
    Ok(true)
}

/// `scanerr check`: report whether the stored settings are usable.
pub fn check(path: &Path) -> bool {
    let check = check_settings(path);
    let api_root = load_settings(path).api_root.unwrap_or_default();
    output::print_settings_check(&check, &api_root);
    check.passed()
}
