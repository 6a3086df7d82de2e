//! # Authgate
//!
//! HTTP facade over an AWS Cognito user pool.
//!
//! ## Endpoints
//!
//! - `POST /auth/register`: create an unconfirmed identity
//! - `POST /auth/authenticate`: exchange credentials for the pool's ID token
//! - `POST /auth/confirm-email`: consume the emailed six-digit code
//! - `GET /auth/profile`: bearer-protected; echoes the requested username
//!
//! Request bodies are checked against [`api::validation`] contracts before anything
//! reaches the provider. Provider failures surface as 400 responses carrying the
//! provider's message unchanged.

pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod server;

// Re-export commonly used types
pub use config::Config;
pub use error::{ApiError, Result};
pub use server::{build_router, AppState, Server};

/// Version of the authgate-api crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
