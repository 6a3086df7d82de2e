//! API middleware stack

mod auth;

pub use auth::{auth_middleware, extract_bearer_token, AuthContext, AuthorizationError};

use crate::{error::ApiError, server::AppState};
use axum::{error_handling::HandleErrorLayer, BoxError, Router};
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::warn;

/// Apply the shared middleware to a router
pub fn apply_middleware(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let deadline = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(handle_middleware_error))
        .layer(TimeoutLayer::new(state.config.request_timeout()));

    router
        .layer(deadline)
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}

/// Render middleware failures in the common error shape
async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        warn!("Request exceeded the server deadline");
        ApiError::RequestTimeout
    } else {
        ApiError::Internal {
            message: format!("Unhandled middleware error: {err}"),
        }
    }
}
