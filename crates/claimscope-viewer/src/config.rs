//! Configuration file parsing for the Viewer.
//!
//! Loads settings from TOML files: bind address, results directory, reload
//! interval and the bookkeeping files to skip.

use claimscope_corpus::DEFAULT_IGNORED_FILES;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Viewer configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),
}

/// Viewer configuration loaded from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port (e.g., 5009)
    pub bind_port: u16,

    /// Directory holding analysis artifacts
    pub results_dir: PathBuf,

    /// Seconds a loaded corpus is served before reloading (0: reload every request)
    #[serde(default = "default_reload_interval")]
    pub reload_interval_secs: u64,

    /// File names in the results directory that are not artifacts
    #[serde(default = "default_ignored_files")]
    pub ignored_files: Vec<String>,
}

/// Default reload interval: 30 seconds
fn default_reload_interval() -> u64 {
    30
}

fn default_ignored_files() -> Vec<String> {
    DEFAULT_IGNORED_FILES.iter().map(|s| s.to_string()).collect()
}

impl ViewerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ViewerConfig = toml::from_str(&contents)?;

        if config.bind_address.trim().is_empty() {
            return Err(ConfigError::MissingField("bind_address".to_string()));
        }
        if config.results_dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("results_dir".to_string()));
        }

        Ok(config)
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        ViewerConfig {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 5009,
            results_dir: PathBuf::from("output/analysis_results"),
            reload_interval_secs: default_reload_interval(),
            ignored_files: default_ignored_files(),
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }

    /// Reload interval as a Duration
    pub fn reload_interval(&self) -> Duration {
        Duration::from_secs(self.reload_interval_secs)
    }
}
