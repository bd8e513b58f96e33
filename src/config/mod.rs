//! Configuration management.
//!
//! Settings are layered: built-in defaults, then a TOML file, then
//! environment variables prefixed with `RESEARCH_HUB` (nested keys use `__`,
//! e.g. `RESEARCH_HUB_API__BASE_URL`).

mod file_config;

pub use file_config::{
    default_config_path, find_config_file, save_config, to_toml, ConfigFileError, LOCAL_CONFIG_FILE,
};

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::client::SearchError;
use crate::models::{default_source_options, SourceCatalog, SourceId, SourceOption};

/// Endpoint of the reference search backend
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api/search";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "RESEARCH_HUB";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Source selected when none is given
    #[serde(default = "default_source")]
    pub default_source: SourceId,

    /// Search API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Sources offered to the user
    #[serde(default = "default_source_options")]
    pub sources: Vec<SourceOption>,

    /// Startup connectivity check
    #[serde(default)]
    pub probe: ProbeConfig,

    /// Result presentation
    #[serde(default)]
    pub display: DisplayConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_source: default_source(),
            api: ApiConfig::default(),
            sources: default_source_options(),
            probe: ProbeConfig::default(),
            display: DisplayConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Build the source catalog from the configured options
    pub fn catalog(&self) -> Result<SourceCatalog, SearchError> {
        SourceCatalog::new(self.sources.clone(), self.default_source.clone())
    }
}

fn default_source() -> SourceId {
    SourceId::new("arxiv")
}

/// Search API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Search endpoint; queries are appended as URL parameters
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout. Unset means the transport default applies.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: None,
            user_agent: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Startup connectivity check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Query text sent by the probe
    #[serde(default = "default_probe_query")]
    pub query: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            query: default_probe_query(),
        }
    }
}

fn default_probe_query() -> String {
    crate::client::DEFAULT_PROBE_QUERY.to_string()
}

/// Result presentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Reveal cards one after another
    #[serde(default = "default_true")]
    pub animate: bool,

    /// Delay between consecutive cards, in milliseconds
    #[serde(default = "default_stagger_ms")]
    pub stagger_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            animate: true,
            stagger_ms: default_stagger_ms(),
        }
    }
}

impl DisplayConfig {
    /// Card stagger, zero when animation is off
    pub fn stagger(&self) -> Duration {
        if self.animate {
            Duration::from_millis(self.stagger_ms)
        } else {
            Duration::ZERO
        }
    }
}

fn default_stagger_ms() -> u64 {
    100
}

fn default_true() -> bool {
    true
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `text` (default) or `json`
    #[serde(default)]
    pub format: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: None,
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(environment())
        .build()?;

    settings.try_deserialize()
}

/// Get the configuration from defaults and environment variables only
pub fn get_config() -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder().add_source(environment()).build()?;

    settings.try_deserialize()
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert!(config.api.timeout_seconds.is_none());
        assert_eq!(config.default_source.as_str(), "arxiv");
        assert_eq!(config.sources.len(), 2);
        assert!(config.probe.enabled);
        assert_eq!(config.probe.query, "test");
        assert_eq!(config.display.stagger(), Duration::from_millis(100));
    }

    #[test]
    fn test_stagger_disabled() {
        let display = DisplayConfig {
            animate: false,
            stagger_ms: 250,
        };
        assert_eq!(display.stagger(), Duration::ZERO);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"
default_source = "medrxiv"

[api]
base_url = "https://papers.example.org/api/search"
timeout_seconds = 15

[[sources]]
id = "medrxiv"
label = "medRxiv"

[display]
animate = false
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.api.base_url, "https://papers.example.org/api/search");
        assert_eq!(config.api.timeout_seconds, Some(15));
        assert_eq!(config.default_source.as_str(), "medrxiv");
        assert_eq!(config.sources, vec![SourceOption::new("medrxiv", "medRxiv")]);
        assert!(!config.display.animate);
        assert_eq!(config.display.stagger_ms, 100);
        assert!(config.probe.enabled);

        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.default_source().as_str(), "medrxiv");
    }

    #[test]
    fn test_logging_format() {
        let mut logging = LoggingConfig::default();
        assert!(!logging.is_json());
        logging.format = Some("JSON".to_string());
        assert!(logging.is_json());
    }
}
