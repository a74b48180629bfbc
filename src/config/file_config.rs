//! Configuration file support for crate2bib.
//!
//! # Configuration File Format
//!
//! ```toml
//! [registry]
//! base_url = "https://crates.io"
//! user_agent = "my-thesis-bibliography (me@example.org)"
//! timeout_seconds = 30
//! connect_timeout_seconds = 10
//!
//! [output]
//! templates = ["inline", "fields"]
//! include_yanked = false
//! limit = 5
//! ```
//!
//! The file is looked up as `crate2bib.toml` in the working directory, then
//! as `crate2bib/config.toml` in the platform config directory.

use std::path::{Path, PathBuf};

use super::Config;

/// File name searched for in the working directory
pub const CONFIG_FILE_NAME: &str = "crate2bib.toml";

/// Find the first existing configuration file in the default locations
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("crate2bib").join("config.toml"))
        .filter(|path| path.is_file())
}

/// Write `config` as TOML, creating parent directories as needed
pub fn save_config(config: &Config, path: &Path) -> Result<(), ConfigFileError> {
    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
    }
    std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}
