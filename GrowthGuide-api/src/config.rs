//! Application configuration read from the environment.
//!
//! Reference tables are located through `GROWTH_REFERENCE_PATH`, which the
//! reference layer reads itself when the default growth service is built.

use thiserror::Error;
use tracing::warn;

use growth_guide_data::models::ReferenceDataset;

/// Default listening port
pub const DEFAULT_PORT: u16 = 3000;

/// Configuration errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("PORT must be a number between 1 and 65535, got {0:?}")]
    InvalidPort(String),

    #[error("Unknown DEFAULT_REFERENCE {0:?}; expected uk-who, turners-syndrome, trisomy-21 or cdc")]
    UnknownReference(String),
}

/// Settings for one API process
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub port: u16,

    /// Deployment environment reported by the health check
    pub environment: String,

    /// Dataset used when a request does not choose one
    pub default_reference: ReferenceDataset,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            environment: "development".to_string(),
            default_reference: ReferenceDataset::default(),
        }
    }
}

impl AppConfig {
    /// Read `PORT`, `APP_ENV` and `DEFAULT_REFERENCE` from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from any key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(value) => match value.trim().parse::<u16>() {
                Ok(port) if port > 0 => port,
                _ => return Err(ConfigError::InvalidPort(value)),
            },
            None => defaults.port,
        };

        let environment = lookup("APP_ENV").unwrap_or_else(|| {
            warn!("APP_ENV not set, defaulting to {}", defaults.environment);
            defaults.environment.clone()
        });

        let default_reference = match lookup("DEFAULT_REFERENCE") {
            Some(code) => ReferenceDataset::from_code(code.trim())
                .ok_or(ConfigError::UnknownReference(code))?,
            None => defaults.default_reference,
        };

        Ok(Self {
            port,
            environment,
            default_reference,
        })
    }
}
