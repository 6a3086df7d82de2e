//! Error types shared across authgate crates

use thiserror::Error;

/// Marker trait implemented by every top-level authgate error type
pub trait AuthgateError: std::error::Error + Send + Sync + 'static {}

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The configuration sources could not be parsed or merged
    #[error("Failed to parse configuration: {details}")]
    ParseError { details: String },

    /// A required value is absent or empty
    #[error("Missing required configuration value: {key}")]
    MissingValue { key: String },

    /// A value is present but unusable
    #[error("Invalid configuration value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

impl AuthgateError for ConfigurationError {}
