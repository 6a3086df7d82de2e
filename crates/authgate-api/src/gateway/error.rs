//! Identity provider failures

use std::fmt;
use thiserror::Error;

/// Classification of a provider failure
///
/// The HTTP layer maps every kind to the same client error; the kind is carried along so
/// callers can tell throttling apart from bad credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorKind {
    InvalidCredentials,
    UserNotConfirmed,
    UserNotFound,
    UserExists,
    InvalidPassword,
    InvalidParameter,
    CodeMismatch,
    ExpiredCode,
    Throttled,
    ChallengeRequired,
    InvalidToken,
    Timeout,
    Network,
    Provider,
}

impl GatewayErrorKind {
    /// Map a Cognito `__type` value (optionally `prefix#Name`) onto a kind
    pub fn from_provider_type(error_type: &str) -> Self {
        let name = error_type.rsplit('#').next().unwrap_or(error_type);
        match name {
            "NotAuthorizedException" => Self::InvalidCredentials,
            "UserNotConfirmedException" => Self::UserNotConfirmed,
            "UserNotFoundException" => Self::UserNotFound,
            "UsernameExistsException" | "AliasExistsException" => Self::UserExists,
            "InvalidPasswordException" => Self::InvalidPassword,
            "InvalidParameterException" => Self::InvalidParameter,
            "CodeMismatchException" => Self::CodeMismatch,
            "ExpiredCodeException" => Self::ExpiredCode,
            "TooManyRequestsException"
            | "LimitExceededException"
            | "TooManyFailedAttemptsException" => Self::Throttled,
            _ => Self::Provider,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid_credentials",
            Self::UserNotConfirmed => "user_not_confirmed",
            Self::UserNotFound => "user_not_found",
            Self::UserExists => "user_exists",
            Self::InvalidPassword => "invalid_password",
            Self::InvalidParameter => "invalid_parameter",
            Self::CodeMismatch => "code_mismatch",
            Self::ExpiredCode => "expired_code",
            Self::Throttled => "throttled",
            Self::ChallengeRequired => "challenge_required",
            Self::InvalidToken => "invalid_token",
            Self::Timeout => "timeout",
            Self::Network => "network",
            Self::Provider => "provider",
        }
    }
}

impl fmt::Display for GatewayErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed provider call; `message` is the provider's own text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct GatewayError {
    pub kind: GatewayErrorKind,
    pub message: String,
}

impl GatewayError {
    pub fn new(kind: GatewayErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout() -> Self {
        Self::new(GatewayErrorKind::Timeout, "Identity provider request timed out")
    }

    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorKind::InvalidToken, message)
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout()
        } else {
            Self::new(GatewayErrorKind::Network, err.to_string())
        }
    }
}
