//! Remembered-paths configuration with fail-soft load.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Config file name, resolved under the home directory.
pub const C_NAME_CONFIG_FILE: &str = ".stencilkit_config.json";

/// Remembered last-used paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecCliConfig {
    /// Last-used source spreadsheet path.
    pub excel_path: Option<String>,
    /// Last-used template file path.
    pub template_path: Option<String>,
    /// Last-used output directory.
    pub output_path: Option<String>,
}

/// Resolve the config file location from the home directory.
pub fn derive_config_file_path() -> Option<PathBuf> {
    let dir_home = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE"))?;
    Some(PathBuf::from(dir_home).join(C_NAME_CONFIG_FILE))
}

/// Load remembered paths; a missing or malformed file degrades to defaults.
pub fn load_config() -> SpecCliConfig {
    match derive_config_file_path() {
        Some(path_config) => load_config_from(&path_config),
        None => SpecCliConfig::default(),
    }
}

fn load_config_from(path_config: &Path) -> SpecCliConfig {
    let raw_config = match fs::read_to_string(path_config) {
        Ok(value) => value,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return SpecCliConfig::default(),
        Err(e) => {
            warn!("Failed to read config {}: {e}", path_config.display());
            return SpecCliConfig::default();
        }
    };

    match serde_json::from_str(&raw_config) {
        Ok(config) => config,
        Err(e) => {
            warn!("Ignoring malformed config {}: {e}", path_config.display());
            SpecCliConfig::default()
        }
    }
}

/// Persist remembered paths; failures are logged, never fatal.
pub fn save_config(config: &SpecCliConfig) {
    if let Some(path_config) = derive_config_file_path() {
        save_config_to(&path_config, config);
    }
}

fn save_config_to(path_config: &Path, config: &SpecCliConfig) {
    let payload = match serde_json::to_string_pretty(config) {
        Ok(value) => value,
        Err(e) => {
            warn!("Failed to serialize config: {e}");
            return;
        }
    };
    if let Err(e) = fs::write(path_config, payload) {
        warn!("Failed to save config {}: {e}", path_config.display());
    }
}
