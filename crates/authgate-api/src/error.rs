//! Error types for the authgate HTTP layer

use authgate_common::{AuthgateError, ConfigurationError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

use crate::api::middleware::AuthorizationError;
use crate::api::validation::ValidationError;
use crate::gateway::GatewayError;

/// Main error type for the authgate service
#[derive(Debug, Error)]
pub enum ApiError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigurationError),

    /// HTTP client construction error
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Request body rejected before reaching the provider
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Provider call failed
    #[error("{0}")]
    Gateway(#[from] GatewayError),

    /// Bearer token missing or rejected
    #[error("{0}")]
    Unauthorized(#[from] AuthorizationError),

    /// Request exceeded the server-wide deadline
    #[error("Request timed out")]
    RequestTimeout,

    /// Internal server error
    #[error("Internal server error: {message}")]
    Internal { message: String },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ApiError>;

impl AuthgateError for ApiError {}

impl ApiError {
    /// Machine-readable discriminator included in error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Config(_) => "configuration",
            ApiError::HttpClient(_) => "http_client",
            ApiError::Validation(_) => "validation",
            ApiError::Gateway(e) => e.kind.as_str(),
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::RequestTimeout => "request_timeout",
            ApiError::Internal { .. } => "internal",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Gateway(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::Config(_) | ApiError::HttpClient(_) | ApiError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (message, field) = match &self {
            ApiError::Validation(e) => (e.message.clone(), Some(e.field.clone())),
            ApiError::Gateway(e) => (e.message.clone(), None),
            ApiError::Unauthorized(_) => ("Unauthorized".to_string(), None),
            ApiError::RequestTimeout => (self.to_string(), None),
            ApiError::Config(_) | ApiError::HttpClient(_) | ApiError::Internal { .. } => {
                error!("Internal API error: {}", self);
                ("Internal server error".to_string(), None)
            }
        };

        let body = ErrorResponse {
            status_code: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message,
            kind: self.kind().to_string(),
            field,
        };

        (status, Json(body)).into_response()
    }
}

/// Error body returned by every endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// HTTP status code
    pub status_code: u16,

    /// HTTP reason phrase
    pub error: String,

    /// Human-readable message; provider messages are passed through unchanged
    pub message: String,

    /// Error classification
    pub kind: String,

    /// Offending request field, for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}
