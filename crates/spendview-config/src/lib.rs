//! Configuration management for spendview
//!
//! This module handles loading and validation of spendview configuration
//! from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use error::ConfigError;

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8082
}

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the data directory
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
    /// Dataset file name (roster plus transaction list, JSON)
    #[serde(default = "default_dataset_file")]
    pub dataset_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            dataset_file: default_dataset_file(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./data")
}

fn default_dataset_file() -> String {
    "dataset.json".to_string()
}

/// Feed tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Transactions per page of the full feed
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// How many additional rows each "view more" gesture reveals; also the
    /// initial window length
    #[serde(default = "default_window_step")]
    pub window_step: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            window_step: default_window_step(),
        }
    }
}

fn default_page_size() -> usize {
    5
}

fn default_window_step() -> usize {
    5
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Data location settings
    #[serde(default)]
    pub data: DataConfig,
    /// Feed tuning
    #[serde(default)]
    pub feed: FeedConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound {
                    path: path.to_string_lossy().to_string(),
                }
            } else {
                ConfigError::IoError
            }
        })?;

        let config: Config =
            serde_yaml::from_str(&content).map_err(|_| ConfigError::InvalidYaml)?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if self.feed.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "feed.page_size".to_string(),
                reason: "Page size must be at least 1".to_string(),
            });
        }

        if self.feed.window_step == 0 {
            return Err(ConfigError::InvalidValue {
                field: "feed.window_step".to_string(),
                reason: "Window step must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Get the full path to the dataset file
    pub fn dataset_path(&self) -> PathBuf {
        self.data.path.join(&self.data.dataset_file)
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8082);
        assert_eq!(config.data.dataset_file, "dataset.json");
        assert_eq!(config.feed.page_size, 5);
        assert_eq!(config.feed.window_step, 5);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "server:\n  port: 9000\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.feed.page_size, 5);
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "server.port"));
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let mut config = Config::default();
        config.feed.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_window_step() {
        let mut config = Config::default();
        config.feed.window_step = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_dataset_path_joins_dir_and_file() {
        let config = Config::default();
        assert_eq!(config.dataset_path(), PathBuf::from("./data/dataset.json"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(PathBuf::from("/no/such/config.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }
}
