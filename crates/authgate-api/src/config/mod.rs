//! Configuration module for the authgate service

mod cognito;
mod server;

pub use cognito::CognitoConfig;
pub use server::ServerConfig;

use authgate_common::{ConfigLoader, ConfigurationError as ConfigError};
use figment::{providers::Serialized, Figment};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variables recognised for compatibility with existing deployments
const LEGACY_ENV: [(&str, &str); 2] = [
    ("AWS_COGNITO_USER_POOL_ID", "cognito.user_pool_id"),
    ("AWS_COGNITO_CLIENT_ID", "cognito.client_id"),
];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Identity provider configuration
    pub cognito: CognitoConfig,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        <Config as ConfigLoader>::load(config_path)
    }

    /// Generate example configuration file
    pub fn generate_example() -> Result<String, ConfigError> {
        let config = Self::default();
        toml::to_string_pretty(&config).map_err(|e| ConfigError::ParseError {
            details: format!("Failed to serialize config: {e}"),
        })
    }

    /// Check everything required at startup
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.cognito.validate()
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout)
    }

    /// Get provider call timeout as Duration
    pub fn gateway_timeout(&self) -> Duration {
        self.cognito.gateway_timeout()
    }
}

impl ConfigLoader for Config {
    const DEFAULT_FILE: &'static str = "authgate.toml";
    const ENV_PREFIX: &'static str = "AUTHGATE_";

    fn extend(figment: Figment) -> Figment {
        LEGACY_ENV
            .iter()
            .filter_map(|(var, key)| std::env::var(var).ok().map(|value| (*key, value)))
            .fold(figment, |figment, (key, value)| {
                figment.merge(Serialized::default(key, value))
            })
    }
}
