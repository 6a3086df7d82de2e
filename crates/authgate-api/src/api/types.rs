//! Request and response bodies of the auth endpoints

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::validation::{Operation, RequestSchema, DIGITS};

/// Body of `POST /auth/register`
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Email address used as the username
    #[schema(example = "jane@example.com")]
    #[validate(email(message = "Invalid email"))]
    pub username: String,
    #[validate(length(min = 1, message = "String must contain at least 1 character(s)"))]
    pub password: String,
}

impl RequestSchema for RegisterRequest {
    const OPERATION: Operation = Operation::Register;
}

/// Body of `POST /auth/authenticate`
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AuthenticateRequest {
    #[schema(example = "jane@example.com")]
    #[validate(email(message = "Invalid email"))]
    pub username: String,
    #[validate(length(min = 1, message = "String must contain at least 1 character(s)"))]
    pub password: String,
}

impl RequestSchema for AuthenticateRequest {
    const OPERATION: Operation = Operation::Authenticate;
}

/// Body of `POST /auth/confirm-email`
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ConfirmEmailRequest {
    #[schema(example = "jane@example.com")]
    #[validate(email(message = "Invalid email"))]
    pub username: String,
    /// Six ASCII digits from the confirmation email
    #[schema(example = "123456")]
    #[validate(
        length(equal = 6, message = "String must be exactly 6 digits"),
        regex(path = *DIGITS, message = "String must only contain digits")
    )]
    pub code: String,
}

impl RequestSchema for ConfirmEmailRequest {
    const OPERATION: Operation = Operation::ConfirmEmail;
}

/// Body of `GET /auth/profile`
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProfileRequest {
    #[schema(example = "jane@example.com")]
    #[validate(email(message = "Invalid email"))]
    pub username: String,
}

impl RequestSchema for ProfileRequest {
    const OPERATION: Operation = Operation::Profile;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ConfirmEmailResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthCheckResponse {
    pub status: String,
    pub version: String,
}
