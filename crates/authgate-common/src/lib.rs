//! Shared building blocks for the authgate binaries
//!
//! - [`config`]: the [`ConfigLoader`] contract and the [`ConfigurationError`] type
//! - [`logging`]: unified `tracing` subscriber setup

pub mod config;
pub mod error;
pub mod logging;

pub use config::ConfigLoader;
pub use error::{AuthgateError, ConfigurationError};
