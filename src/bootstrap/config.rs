//! # Configuration loader
//!
//! Reads the TOML file and hands it to [`StoreConfig::from_toml`]. Defaults
//! live in the DTO; this module only finds and reads the file.

use anyhow::Context;
use std::path::{Path, PathBuf};

use mg_core::StoreConfig;

/// Environment variable pointing at an explicit config file.
pub const CONFIG_PATH_ENV: &str = "MAGNETSHOP_CONFIG";

const APP_DIR_NAME: &str = "magnetshop";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Per-user data directory, e.g. `~/.local/share/magnetshop`.
pub fn default_base_dir() -> anyhow::Result<PathBuf> {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .context("Could not determine local data directory")
}

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns error if the file cannot be read, is not valid TOML, or holds
/// values that do not fit their fields.
pub fn load_config(config_path: &Path, base_dir: PathBuf) -> anyhow::Result<StoreConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    StoreConfig::from_toml(&toml_value, base_dir)
}

/// Picks the config source: `$MAGNETSHOP_CONFIG`, then
/// `<config dir>/magnetshop/config.toml` if present, then built-in defaults.
pub fn resolve_config(base_dir: PathBuf) -> anyhow::Result<StoreConfig> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return load_config(Path::new(&path), base_dir);
    }

    let default_path = dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME));
    match default_path {
        Some(path) if path.exists() => load_config(&path, base_dir),
        _ => Ok(StoreConfig::defaults(base_dir)),
    }
}
