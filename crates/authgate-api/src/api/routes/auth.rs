//! Auth route handlers
//!
//! Every handler follows the same steps: check the body against its contract, make
//! one gateway call under the configured timeout, and shape the result. Validation
//! failures return before the gateway is touched.

use crate::{
    api::{
        middleware::AuthContext,
        types::{
            AuthenticateRequest, ConfirmEmailRequest, ConfirmEmailResponse, ProfileRequest,
            ProfileResponse, RegisterRequest,
        },
        validation::validate,
    },
    error::{ErrorResponse, Result},
    gateway::{with_timeout, UserHandle},
    server::AppState,
};
use axum::{body::Bytes, extract::State, http::StatusCode, Extension, Json};
use tracing::{debug, info};

/// Message returned after a successful confirmation
pub const EMAIL_CONFIRMED: &str = "Email confirmed successfully";

/// Create an unconfirmed identity with the provider
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Identity created, awaiting confirmation", body = UserHandle),
        (status = 400, description = "Invalid body or provider rejection", body = ErrorResponse),
    ),
    tag = "auth",
)]
pub async fn register(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<UserHandle>)> {
    let request: RegisterRequest = validate(&body)?;
    info!("Registering {}", request.username);

    let user = with_timeout(
        state.config.gateway_timeout(),
        state.gateway.sign_up(&request.username, &request.password),
    )
    .await?;

    debug!("Registered {} as {}", user.username, user.user_sub);
    Ok((StatusCode::CREATED, Json(user)))
}

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/auth/authenticate",
    request_body = AuthenticateRequest,
    responses(
        (
            status = 201,
            description = "Bearer token issued by the provider",
            body = String,
            content_type = "text/plain"
        ),
        (status = 400, description = "Invalid body or provider rejection", body = ErrorResponse),
    ),
    tag = "auth",
)]
pub async fn authenticate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, String)> {
    let request: AuthenticateRequest = validate(&body)?;
    debug!("Authenticating {}", request.username);

    let token = with_timeout(
        state.config.gateway_timeout(),
        state
            .gateway
            .authenticate(&request.username, &request.password),
    )
    .await?;

    Ok((StatusCode::CREATED, token.into_inner()))
}

/// Confirm an identity with the emailed code
#[utoipa::path(
    post,
    path = "/auth/confirm-email",
    request_body = ConfirmEmailRequest,
    responses(
        (status = 201, description = "Email confirmed", body = ConfirmEmailResponse),
        (status = 400, description = "Invalid body or provider rejection", body = ErrorResponse),
    ),
    tag = "auth",
)]
pub async fn confirm_email(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<ConfirmEmailResponse>)> {
    let request: ConfirmEmailRequest = validate(&body)?;
    info!("Confirming {}", request.username);

    with_timeout(
        state.config.gateway_timeout(),
        state
            .gateway
            .confirm_registration(&request.username, &request.code),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ConfirmEmailResponse {
            message: EMAIL_CONFIRMED.to_string(),
        }),
    ))
}

/// Echo the requested username as the profile email
///
/// Requires `Authorization: Bearer <token>`.
#[utoipa::path(
    get,
    path = "/auth/profile",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 400, description = "Invalid body", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
    ),
    tag = "auth",
)]
pub async fn profile(
    Extension(auth): Extension<AuthContext>,
    body: Bytes,
) -> Result<Json<ProfileResponse>> {
    let request: ProfileRequest = validate(&body)?;
    debug!("Profile requested by {} for {}", auth.user_id(), request.username);

    Ok(Json(ProfileResponse {
        email: request.username,
    }))
}
