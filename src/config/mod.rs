//! Configuration management.
//!
//! Values are layered, lowest precedence first: built-in defaults, a TOML
//! file, then `CRATE2BIB_*` environment variables (nested keys use `__`,
//! e.g. `CRATE2BIB_REGISTRY__USER_AGENT`). The CLI applies its flags on top.

mod file_config;

pub use file_config::{find_config_file, save_config, ConfigFileError, CONFIG_FILE_NAME};

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::models::Origin;
use crate::resolver::ResolveOptions;
use crate::sources::CRATES_IO_API_BASE;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "CRATE2BIB";

/// User agent sent when none is configured
pub const DEFAULT_USER_AGENT: &str = "crate2bib-cli-user-agent";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Registry connection settings
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Candidate selection and rendering
    #[serde(default)]
    pub output: OutputConfig,
}

/// Registry connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Base URL of a crates.io-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Identification sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

impl RegistryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}

fn default_base_url() -> String {
    CRATES_IO_API_BASE.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

/// Candidate selection and rendering settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Templates to render ("inline", "fields")
    #[serde(default = "default_templates")]
    pub templates: Vec<String>,

    /// Keep yanked releases
    #[serde(default)]
    pub include_yanked: bool,

    /// Maximum number of releases to render
    #[serde(default)]
    pub limit: Option<usize>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            templates: default_templates(),
            include_yanked: false,
            limit: None,
        }
    }
}

fn default_templates() -> Vec<String> {
    vec![Origin::InlineVersion.id().to_string()]
}

impl Config {
    /// Resolver options described by the output section
    pub fn resolve_options(&self) -> Result<ResolveOptions, ConfigFileError> {
        let origins = self
            .output
            .templates
            .iter()
            .map(|t| t.parse::<Origin>().map_err(ConfigFileError::Parse))
            .collect::<Result<Vec<_>, _>>()?;

        let mut options = ResolveOptions::default()
            .origins(origins)
            .include_yanked(self.output.include_yanked);
        options.limit = self.output.limit;
        Ok(options)
    }
}

/// Load configuration from an optional file plus the environment
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("output.templates")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.registry.base_url, "https://crates.io");
        assert_eq!(config.registry.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.registry.timeout(), Duration::from_secs(30));
        assert_eq!(config.output.templates, vec!["inline".to_string()]);
        assert_eq!(config.resolve_options().unwrap(), ResolveOptions::default());
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("crate2bib.toml");
        std::fs::write(
            &path,
            r#"
[registry]
user_agent = "my-thesis-bibliography"
timeout_seconds = 5

[output]
templates = ["fields", "inline"]
limit = 3
"#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.registry.user_agent, "my-thesis-bibliography");
        assert_eq!(config.registry.timeout_seconds, 5);
        assert_eq!(config.registry.connect_timeout_seconds, 10);

        let options = config.resolve_options().unwrap();
        assert_eq!(
            options.origins,
            vec![Origin::VersionFields, Origin::InlineVersion]
        );
        assert_eq!(options.limit, Some(3));
        assert!(!options.include_yanked);
    }

    #[test]
    fn test_unknown_template_is_rejected() {
        let mut config = Config::default();
        config.output.templates = vec!["apa".to_string()];
        assert!(matches!(
            config.resolve_options(),
            Err(ConfigFileError::Parse(_))
        ));
    }
}
