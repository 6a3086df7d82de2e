//! Bearer token guard for protected routes
//!
//! The guard runs before the handler: it pulls the token out of the `Authorization`
//! header, has the gateway verify it, and stores the resulting [`AuthContext`] in the
//! request extensions. Any failure ends the request with 401 and the handler never runs.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    error::ApiError,
    gateway::{with_timeout, Claims},
    server::AppState,
};

/// Reasons a protected request is turned away
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid bearer token: {0}")]
    InvalidToken(String),
}

impl IntoResponse for AuthorizationError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

/// Verified identity attached to a request by [`auth_middleware`]
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub claims: Claims,
}

impl AuthContext {
    /// Subject of the verified token
    pub fn user_id(&self) -> &str {
        &self.claims.sub
    }
}

/// Token from an `Authorization: Bearer <token>` header; the scheme is case-insensitive
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

/// Guard middleware: verify the bearer token, then run the wrapped handler
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthorizationError> {
    let token = extract_bearer_token(req.headers())
        .map(str::to_owned)
        .ok_or_else(|| {
            debug!("Rejected request without bearer token");
            AuthorizationError::MissingToken
        })?;

    let claims = with_timeout(
        state.config.gateway_timeout(),
        state.gateway.verify_token(&token),
    )
    .await
    .map_err(|e| {
        warn!("Bearer token rejected ({}): {}", e.kind, e.message);
        AuthorizationError::InvalidToken(e.message)
    })?;

    debug!("Authenticated request for subject {}", claims.sub);

    req.extensions_mut().insert(AuthContext { claims });

    Ok(next.run(req).await)
}
