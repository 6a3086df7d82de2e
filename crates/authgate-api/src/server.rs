//! Server wiring: configuration in, listening HTTP service out

use crate::{
    api,
    config::Config,
    error::{ApiError, Result},
    gateway::{CognitoGateway, IdentityGateway},
};
use axum::Router;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

/// Main server structure
pub struct Server {
    config: Arc<Config>,
    app: Router,
}

/// Shared application state, read-only after startup
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,

    /// Identity provider client
    pub gateway: Arc<dyn IdentityGateway>,
}

impl AppState {
    pub fn new(config: Arc<Config>, gateway: Arc<dyn IdentityGateway>) -> Self {
        Self { config, gateway }
    }
}

impl Server {
    /// Validate configuration and build the Cognito-backed service
    pub async fn new(config: Config) -> Result<Self> {
        info!("Initializing authgate server");

        config.validate()?;
        let config = Arc::new(config);

        info!(
            "Using user pool {} (client {}) via {}",
            config.cognito.user_pool_id,
            config.cognito.client_id,
            config.cognito.endpoint_url()
        );

        let gateway: Arc<dyn IdentityGateway> =
            Arc::new(CognitoGateway::new(&config.cognito).await?);

        Ok(Self::with_gateway(config, gateway))
    }

    /// Build a server around an already constructed gateway
    pub fn with_gateway(config: Arc<Config>, gateway: Arc<dyn IdentityGateway>) -> Self {
        let state = AppState::new(config.clone(), gateway);
        let app = build_router(state);

        Self { config, app }
    }

    /// Run the server until shutdown signal
    pub async fn run(self) -> Result<()> {
        let addr = self.config.server.bind_address;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ApiError::Internal {
                message: format!("Failed to bind to address {addr}: {e}"),
            })?;

        info!("authgate listening on {}", addr);

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ApiError::Internal {
                message: format!("Server error: {e}"),
            })?;

        Ok(())
    }
}

/// Build the application router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    api::routes(state.clone()).with_state(state)
}

/// Shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            warn!("Received terminate signal, shutting down");
        },
    }
}
