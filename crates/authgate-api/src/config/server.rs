//! HTTP server configuration

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub bind_address: SocketAddr,

    /// Whole-request timeout in seconds
    pub request_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: ([0, 0, 0, 0], 3000).into(),
            request_timeout: 30,
        }
    }
}
