use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::repositories::CART_STORAGE_KEY;

/// Prefix of every environment variable read by [`Config::from_environment`]
pub const ENV_PREFIX: &str = "SHOECART";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading error: {message}")]
    LoadError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub storage: StorageConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_cart_key")]
    pub cart_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub enable_json_logging: bool,
}

impl Config {
    /// Load configuration from `SHOECART_*` environment variables
    pub fn from_environment() -> Result<Self, ConfigError> {
        let catalog = CatalogConfig::from_env()?;
        let storage = StorageConfig::from_env()?;
        let observability = ObservabilityConfig::from_env()?;

        let config = Config {
            catalog,
            storage,
            observability,
        };

        config.validate()?;

        info!("Configuration loaded successfully");
        debug!("Configuration: {:?}", config);

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "Catalog base URL cannot be empty".to_string(),
            });
        }

        if !self.catalog.base_url.starts_with("http://")
            && !self.catalog.base_url.starts_with("https://")
        {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "Catalog base URL must use http or https: {}",
                    self.catalog.base_url
                ),
            });
        }

        if self.catalog.request_timeout_seconds == 0 {
            return Err(ConfigError::ValidationError {
                message: "Request timeout cannot be 0".to_string(),
            });
        }

        if self.storage.cart_key.is_empty() {
            return Err(ConfigError::ValidationError {
                message: "Cart storage key cannot be empty".to_string(),
            });
        }

        if self.storage.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "Data directory cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// Deserialize one section from the prefixed environment
fn section_from_env<T: serde::de::DeserializeOwned>(section: &str) -> Result<T, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::Environment::with_prefix(ENV_PREFIX))
        .build()
        .map_err(|e| ConfigError::LoadError {
            message: format!("Failed to load {} config: {}", section, e),
        })?;

    settings
        .try_deserialize()
        .map_err(|e| ConfigError::LoadError {
            message: format!("Failed to deserialize {} config: {}", section, e),
        })
}

impl CatalogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        section_from_env("catalog")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl StorageConfig {
    fn from_env() -> Result<Self, ConfigError> {
        section_from_env("storage")
    }
}

impl ObservabilityConfig {
    fn from_env() -> Result<Self, ConfigError> {
        section_from_env("observability")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig {
                base_url: default_base_url(),
                request_timeout_seconds: default_timeout(),
            },
            storage: StorageConfig {
                data_dir: default_data_dir(),
                cart_key: default_cart_key(),
            },
            observability: ObservabilityConfig {
                service_name: default_service_name(),
                log_level: default_log_level(),
                enable_json_logging: false,
            },
        }
    }
}

// Default value functions
pub(crate) fn default_base_url() -> String {
    "http://localhost:3333".to_string()
}

pub(crate) fn default_timeout() -> u64 {
    30
}

pub(crate) fn default_data_dir() -> PathBuf {
    PathBuf::from(".shoecart")
}

pub(crate) fn default_cart_key() -> String {
    CART_STORAGE_KEY.to_string()
}

pub(crate) fn default_service_name() -> String {
    "shoecart-rs".to_string()
}

pub(crate) fn default_log_level() -> String {
    "info".to_string()
}
