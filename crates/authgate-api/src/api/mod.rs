//! HTTP surface: routes, middleware, request contracts

pub mod middleware;
pub mod routes;
pub mod types;
pub mod validation;

use crate::server::AppState;
use axum::{
    routing::{get, post},
    Json, Router,
};
use utoipa::OpenApi;

/// Create all routes
///
/// The bearer guard is layered onto `/auth/profile` only, so it always runs before
/// that handler and never in front of the public endpoints.
pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/profile", get(routes::auth::profile))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    let auth = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/authenticate", post(routes::auth::authenticate))
        .route("/confirm-email", post(routes::auth::confirm_email))
        .merge(protected);

    let router = Router::new()
        .nest("/auth", auth)
        .route("/health", get(routes::health::health_check))
        .route("/api-docs/openapi.json", get(openapi_json));

    middleware::apply_middleware(router, &state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        routes::auth::register,
        routes::auth::authenticate,
        routes::auth::confirm_email,
        routes::auth::profile,
        routes::health::health_check,
    ),
    components(schemas(
        types::RegisterRequest,
        types::AuthenticateRequest,
        types::ConfirmEmailRequest,
        types::ConfirmEmailResponse,
        types::ProfileRequest,
        types::ProfileResponse,
        types::HealthCheckResponse,
        crate::gateway::UserHandle,
        crate::error::ErrorResponse,
    )),
    tags(
        (name = "auth", description = "Registration, sign-in and profile"),
        (name = "health", description = "Health and monitoring"),
    ),
    info(
        title = "Authgate API",
        version = "1.0.0",
        description = "HTTP facade over an AWS Cognito user pool",
        license(
            name = "MIT",
        ),
    ),
)]
pub struct ApiDoc;
