//! Configuration loading and default paths
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/logvault/config.toml`
//! (~/.config/logvault/config.toml); log files go to the XDG state
//! directory. The database default is fixed at `<home>/logs/cli/cli.db`
//! and every procedure accepts a per-call `dbPath` that takes precedence.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

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

/// Default location of the CLI log database: `<home>/logs/cli/cli.db`.
///
/// Pure path composition, no I/O; the file and its parent directories are
/// created lazily by [`crate::db::Database::open`].
pub fn default_db_path() -> PathBuf {
    home_dir().join("logs").join("cli").join("cli.db")
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Override for the database path (per-call `dbPath` still wins)
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of rotated log files to keep
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
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/logvault/config.toml` (~/.config/logvault/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("logvault").join("config.toml")
    }

    /// Returns the state directory path (for logvault's own log output)
    ///
    /// `$XDG_STATE_HOME/logvault/` (~/.local/state/logvault/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("logvault")
    }

    /// Returns the database path: the config override, or the fixed default
    pub fn database_path(&self) -> PathBuf {
        self.db_path.clone().unwrap_or_else(default_db_path)
    }
}
