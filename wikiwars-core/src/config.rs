//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/wikiwars/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/wikiwars/` (~/.config/wikiwars/)
//! - State/Logs: `$XDG_STATE_HOME/wikiwars/` (~/.local/state/wikiwars/)
//!
//! Nothing else is written to disk; every request recomputes from a full fetch.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Public English Wikipedia API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// MediaWiki API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Dashboard presentation settings
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// MediaWiki API configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// `api.php` endpoint of the wiki to query
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// User-Agent sent with every request (Wikimedia requires one)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Timeout for a single HTTP request in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Timeout for a whole paginated fetch in seconds (0 disables it)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Upper bound on pages followed for a single subject
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            max_pages: default_max_pages(),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_user_agent() -> String {
    format!(
        "wikiwars/{} (https://github.com/wikiwars/wikiwars)",
        env!("CARGO_PKG_VERSION")
    )
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_request_timeout_secs() -> u64 {
    300
}

fn default_max_pages() -> usize {
    1000
}

/// Dashboard configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    /// How many recently searched articles to keep
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Length of top contributor / top article rankings
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            top_n: default_top_n(),
        }
    }
}

fn default_history_capacity() -> usize {
    3
}

fn default_top_n() -> usize {
    10
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.api.endpoint.trim().is_empty() {
            return Err(Error::Config("api.endpoint must not be empty".to_string()));
        }
        if self.api.user_agent.trim().is_empty() {
            return Err(Error::Config(
                "api.user_agent must not be empty".to_string(),
            ));
        }
        if self.api.timeout_secs == 0 {
            return Err(Error::Config(
                "api.timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.api.max_pages == 0 {
            return Err(Error::Config("api.max_pages must be at least 1".to_string()));
        }
        if self.dashboard.history_capacity == 0 {
            return Err(Error::Config(
                "dashboard.history_capacity must be at least 1".to_string(),
            ));
        }
        if self.dashboard.top_n == 0 {
            return Err(Error::Config(
                "dashboard.top_n must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/wikiwars/config.toml` (~/.config/wikiwars/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("wikiwars").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/wikiwars/` (~/.local/state/wikiwars/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("wikiwars")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/wikiwars/wikiwars.log` (~/.local/state/wikiwars/wikiwars.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("wikiwars.log")
    }
}
