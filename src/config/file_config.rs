//! Configuration file support for research-hub.
//!
//! # Configuration File Format
//!
//! ```toml
//! default_source = "arxiv"
//!
//! [api]
//! base_url = "http://localhost:5000/api/search"
//! # timeout_seconds = 30
//!
//! [[sources]]
//! id = "arxiv"
//! label = "arXiv"
//!
//! [[sources]]
//! id = "biorxiv"
//! label = "bioRxiv"
//!
//! [probe]
//! enabled = true
//! query = "test"
//!
//! [display]
//! animate = true
//! stagger_ms = 100
//!
//! [logging]
//! level = "info"
//! format = "text"
//! ```
//!
//! Files are looked up in this order: `./research-hub.toml`, then
//! `<config dir>/research-hub/config.toml`.

use std::path::{Path, PathBuf};

use super::Config;

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "research-hub.toml";

/// The per-user config file location, if the platform has a config directory
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("research-hub").join("config.toml"))
}

/// Find the first existing config file in the default locations
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    default_config_path().filter(|path| path.is_file())
}

/// Render a configuration as TOML
pub fn to_toml(config: &Config) -> Result<String, ConfigFileError> {
    toml::to_string_pretty(config).map_err(|e| ConfigFileError::Serialize(e.to_string()))
}

/// Save configuration to a TOML file, creating parent directories.
///
/// An existing file is only replaced when `overwrite` is set.
pub fn save_config(config: &Config, path: &Path, overwrite: bool) -> Result<(), ConfigFileError> {
    if path.exists() && !overwrite {
        return Err(ConfigFileError::Exists(path.to_path_buf()));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
    }

    let content = to_toml(config)?;
    std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialize error: {0}")]
    Serialize(String),

    #[error("Config file already exists: {} (use --force to overwrite)", .0.display())]
    Exists(PathBuf),
}
