//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::ClientConfig;
use crate::poller::PollConfig;

/// Largest `days` value the history endpoint accepts
pub const MAX_HISTORY_DAYS: u32 = 30;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub poll: PollSettings,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Flood-risk API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Unset means no explicit timeout
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

impl ApiConfig {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Poll loop configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PollSettings {
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    #[serde(default = "default_history_days")]
    pub history_days: u32,

    #[serde(default)]
    pub refresh_history: bool,
}

fn default_interval() -> u64 {
    300 // 5 minutes
}

fn default_history_days() -> u32 {
    7
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            history_days: default_history_days(),
            refresh_history: false,
        }
    }
}

impl PollSettings {
    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            interval: Duration::from_secs(self.interval_secs),
            history_days: self.history_days,
            refresh_history: self.refresh_history,
        }
    }
}

/// Local key-value store configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    /// Unset means the platform data directory
    pub path: Option<String>,
}

impl StoreConfig {
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(crate::local_store::default_store_path)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::read(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Layer file, environment and command-line URL, then validate once
    ///
    /// Without an explicit path the first existing default location is
    /// used. A file that exists but cannot be loaded is an error.
    pub fn resolve(path: Option<&Path>, api_url: Option<String>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::read(path)?,
            None => Self::read_first_existing(&Self::default_paths())?,
        };

        config.apply_env_overrides();
        if let Some(url) = api_url {
            config.api.base_url = url;
        }

        config.validate()?;
        Ok(config)
    }

    fn default_paths() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|p| p.join("floodwatch").join("config.toml")),
            Some(PathBuf::from("/etc/floodwatch/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn read_first_existing(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        match paths.iter().find(|path| path.exists()) {
            Some(path) => {
                let config = Self::read(path)?;
                tracing::info!("Loaded config from {:?}", path);
                Ok(config)
            }
            None => {
                tracing::info!("Using default config with environment overrides");
                Ok(Config::default())
            }
        }
    }

    /// Parse a config file without validating it
    fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Reject values the poll loop or API cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll.interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "poll.interval_secs must be at least 1".to_string(),
            ));
        }
        if self.poll.history_days < 1 || self.poll.history_days > MAX_HISTORY_DAYS {
            return Err(ConfigError::Invalid(format!(
                "poll.history_days must be between 1 and {}",
                MAX_HISTORY_DAYS
            )));
        }
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api.base_url must not be empty".to_string()));
        }
        Ok(())
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("FLOODWATCH_API_URL") {
            self.api.base_url = url;
        }

        if let Ok(interval) = std::env::var("FLOODWATCH_POLL_INTERVAL_SECS") {
            if let Ok(secs) = interval.parse() {
                self.poll.interval_secs = secs;
            }
        }
        if let Ok(days) = std::env::var("FLOODWATCH_HISTORY_DAYS") {
            if let Ok(d) = days.parse() {
                self.poll.history_days = d;
            }
        }

        if let Ok(path) = std::env::var("FLOODWATCH_STORE_PATH") {
            self.store.path = Some(path);
        }

        if let Ok(level) = std::env::var("FLOODWATCH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("FLOODWATCH_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Flood Watch Configuration
#
# Environment variables override these settings:
# - FLOODWATCH_API_URL
# - FLOODWATCH_POLL_INTERVAL_SECS
# - FLOODWATCH_HISTORY_DAYS
# - FLOODWATCH_STORE_PATH
# - FLOODWATCH_LOG_LEVEL
# - FLOODWATCH_LOG_FORMAT

[api]
# Base URL of the flood-risk API
base_url = "http://localhost:5000"

# Request timeout in seconds (unset: transport default)
# request_timeout_secs = 30

[poll]
# Seconds between poll cycles
interval_secs = 300

# Days of history to chart (1-30)
history_days = 7

# Refetch history every cycle instead of only at startup
refresh_history = false

[store]
# Where the dark-mode flag is kept (unset: platform data directory)
# path = "~/.local/share/floodwatch/local_storage.json"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
