//! Configuration management for the qcompare CLI.
//!
//! Supports loading configuration from:
//! 1. A YAML file (`--config`, or `~/.qcompare/config.yaml` when present)
//! 2. Environment variables (with `QCOMPARE_` prefix)
//! 3. `.env` files
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use qcompare_client::{ApiKeys, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Inventory service connection
    #[serde(default)]
    pub api: ApiConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Terminal output
    #[serde(default)]
    pub display: DisplayConfig,

    /// Per-platform keys forwarded to the job endpoints
    #[serde(default)]
    pub api_keys: ApiKeys,
}

/// Inventory service settings.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the REST API
    #[serde(default = "default_api_url")]
    pub url: String,

    /// Optional bearer token (set via QCOMPARE_API_TOKEN)
    #[serde(default)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when no `-v` flag is given (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format (console, json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Terminal output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Provider groups per page in the systems listing
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_api_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "console".to_string()
}

fn default_page_size() -> usize {
    20
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            token: None,
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {e}", path.display())))?;

        serde_yaml_ng::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Default config location: `~/.qcompare/config.yaml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".qcompare").join("config.yaml"))
    }

    /// Load configuration with full precedence handling.
    ///
    /// An explicit `config_file` must exist; the default location is only
    /// read when present.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => Self::from_file(path)?,
                None => Config::default(),
            },
        };

        let config = config.merge_env_with(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Merge `QCOMPARE_*` variables read through `lookup`.
    ///
    /// Only variables that are set override the current values; unparsable
    /// numbers are ignored.
    pub fn merge_env_with(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup("QCOMPARE_API_URL") {
            self.api.url = v;
        }
        if let Some(v) = lookup("QCOMPARE_API_TOKEN") {
            self.api.token = Some(v);
        }
        if let Some(v) = lookup("QCOMPARE_TIMEOUT") {
            if let Ok(val) = v.parse() {
                self.api.timeout_seconds = val;
            }
        }
        if let Some(v) = lookup("QCOMPARE_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = lookup("QCOMPARE_LOG_FORMAT") {
            self.logging.format = v;
        }
        if let Some(v) = lookup("QCOMPARE_PAGE_SIZE") {
            if let Ok(val) = v.parse() {
                self.display.page_size = val;
            }
        }
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api.url.starts_with("http://") || self.api.url.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "API URL must start with http:// or https://: {}",
                self.api.url
            )));
        }

        if self.api.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "timeout_seconds must be greater than 0".to_string(),
            ));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: {other}"
                )));
            }
        }

        match self.logging.format.as_str() {
            "console" | "json" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log format: {other}"
                )));
            }
        }

        if self.display.page_size == 0 {
            return Err(ConfigError::ValidationError(
                "page_size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
