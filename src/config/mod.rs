//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::calculate::DEFAULT_K_FACTOR;
use crate::models::DEFAULT_RATING;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Pairing and registration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairingConfig {
    /// Rating given to players registered without one
    #[serde(default = "default_rating")]
    pub default_rating: u32,
}

fn default_rating() -> u32 {
    DEFAULT_RATING
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            default_rating: default_rating(),
        }
    }
}

/// Rating recalculation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingConfig {
    #[serde(default = "default_k_factor")]
    pub k_factor: f64,
}

fn default_k_factor() -> f64 {
    DEFAULT_K_FACTOR
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            k_factor: default_k_factor(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub pairing: PairingConfig,

    #[serde(default)]
    pub rating: RatingConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            server: ServerConfig::default(),
            pairing: PairingConfig::default(),
            rating: RatingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if !self.rating.k_factor.is_finite() || self.rating.k_factor <= 0.0 {
            return Err(ConfigError::ValidationError(
                "Rating K-factor must be a positive number".to_string(),
            ));
        }

        Ok(())
    }
}
