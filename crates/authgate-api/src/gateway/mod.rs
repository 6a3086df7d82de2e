//! Identity gateway: the capability set the HTTP layer needs from the provider
//!
//! [`IdentityGateway`] is the seam between request handling and the network. The
//! production implementation is [`CognitoGateway`]; tests substitute their own.

mod cognito;
mod error;
pub mod jwt_validator;

pub use cognito::CognitoGateway;
pub use error::{GatewayError, GatewayErrorKind};
pub use jwt_validator::{Claims, TokenVerifier};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use utoipa::ToSchema;

/// Handle to a freshly created, not yet confirmed identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserHandle {
    /// Username the identity was registered under
    pub username: String,

    /// Provider-assigned subject identifier
    pub user_sub: String,

    /// Whether the provider already considers the account confirmed
    pub user_confirmed: bool,

    /// Masked destination the confirmation code was sent to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_delivery_destination: Option<String>,
}

/// Opaque signed credential issued by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BearerToken(pub String);

impl BearerToken {
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Operations delegated to the identity provider
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Create an identity; it stays unusable until confirmed
    async fn sign_up(&self, username: &str, password: &str) -> Result<UserHandle, GatewayError>;

    /// Exchange credentials for a bearer token
    async fn authenticate(&self, username: &str, password: &str)
        -> Result<BearerToken, GatewayError>;

    /// Consume the emailed confirmation code
    async fn confirm_registration(&self, username: &str, code: &str) -> Result<(), GatewayError>;

    /// Check a bearer token against the provider's signing keys
    async fn verify_token(&self, token: &str) -> Result<Claims, GatewayError>;
}

/// Bound a provider call; an elapsed deadline becomes [`GatewayErrorKind::Timeout`]
pub async fn with_timeout<T, F>(limit: Duration, call: F) -> Result<T, GatewayError>
where
    F: Future<Output = Result<T, GatewayError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!("Identity provider call exceeded {:?}", limit);
            Err(GatewayError::timeout())
        }
    }
}
