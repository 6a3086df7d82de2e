//! Cognito user pool client built on the AWS SDK

use async_trait::async_trait;
use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion};
use aws_sdk_cognitoidentityprovider::{
    config::Region,
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
    types::AuthFlowType,
    Client,
};
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::{
    BearerToken, Claims, GatewayError, GatewayErrorKind, IdentityGateway, TokenVerifier,
    UserHandle,
};
use crate::config::CognitoConfig;
use crate::error::{ApiError, Result};
use authgate_common::ConfigurationError;

/// [`IdentityGateway`] backed by a Cognito user pool
#[derive(Debug, Clone)]
pub struct CognitoGateway {
    client: Client,
    client_id: String,
    verifier: TokenVerifier,
}

impl CognitoGateway {
    /// Build the SDK client and token verifier from validated configuration
    ///
    /// Sign-up, sign-in and confirmation are public user pool operations, so requests
    /// are sent unsigned. Retries are disabled; every call is bounded by
    /// `gateway_timeout`.
    pub async fn new(config: &CognitoConfig) -> Result<Self> {
        let region = config.region().ok_or_else(|| {
            ApiError::Config(ConfigurationError::MissingValue {
                key: "cognito.region".to_string(),
            })
        })?;

        let timeout = config.gateway_timeout();

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region))
            .no_credentials()
            .retry_config(RetryConfig::disabled())
            .timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(timeout)
                    .connect_timeout(timeout.min(Duration::from_secs(5)))
                    .build(),
            );

        if config.endpoint.is_some() {
            loader = loader.endpoint_url(config.endpoint_url());
        }

        let sdk_config = loader.load().await;

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(5)))
            .user_agent(concat!("authgate/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let verifier = TokenVerifier::new(
            http_client,
            config.jwks_url(),
            config.issuer_url(),
            config.client_id.clone(),
            config.jwks_cache_ttl(),
            config.allowed_clock_skew(),
        );

        Ok(Self {
            client: Client::new(&sdk_config),
            client_id: config.client_id.clone(),
            verifier,
        })
    }
}

/// Translate an SDK failure, keeping the provider's message verbatim
fn provider_error<E, R>(action: &str, err: SdkError<E, R>) -> GatewayError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let error = match &err {
        SdkError::TimeoutError(_) => GatewayError::timeout(),
        SdkError::DispatchFailure(failure) if failure.is_timeout() => GatewayError::timeout(),
        SdkError::DispatchFailure(failure) => GatewayError::new(
            GatewayErrorKind::Network,
            format!("{action} could not reach the identity provider: {failure:?}"),
        ),
        SdkError::ServiceError(context) => {
            let service = context.err();
            let kind = service
                .code()
                .map(GatewayErrorKind::from_provider_type)
                .unwrap_or(GatewayErrorKind::Provider);
            let message = service
                .message()
                .map(str::to_owned)
                .unwrap_or_else(|| format!("{action} was rejected by the identity provider"));
            GatewayError::new(kind, message)
        }
        _ => GatewayError::new(
            GatewayErrorKind::Provider,
            format!("{action} failed: {}", DisplayErrorContext(&err)),
        ),
    };

    warn!("{} failed ({}): {}", action, error.kind, error.message);
    error
}

#[async_trait]
impl IdentityGateway for CognitoGateway {
    #[instrument(level = "debug", skip(self, password))]
    async fn sign_up(
        &self,
        username: &str,
        password: &str,
    ) -> std::result::Result<UserHandle, GatewayError> {
        let output = self
            .client
            .sign_up()
            .client_id(&self.client_id)
            .username(username)
            .password(password)
            .send()
            .await
            .map_err(|e| provider_error("SignUp", e))?;

        debug!(
            "Registered {} as {} (confirmed: {})",
            username,
            output.user_sub(),
            output.user_confirmed()
        );

        Ok(UserHandle {
            username: username.to_string(),
            user_sub: output.user_sub().to_string(),
            user_confirmed: output.user_confirmed(),
            code_delivery_destination: output
                .code_delivery_details()
                .and_then(|details| details.destination())
                .map(str::to_owned),
        })
    }

    #[instrument(level = "debug", skip(self, password))]
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> std::result::Result<BearerToken, GatewayError> {
        let output = self
            .client
            .initiate_auth()
            .auth_flow(AuthFlowType::UserPasswordAuth)
            .client_id(&self.client_id)
            .auth_parameters("USERNAME", username)
            .auth_parameters("PASSWORD", password)
            .send()
            .await
            .map_err(|e| provider_error("InitiateAuth", e))?;

        let id_token = output
            .authentication_result()
            .and_then(|result| result.id_token());

        match (id_token, output.challenge_name()) {
            (Some(token), _) => Ok(BearerToken(token.to_string())),
            (None, Some(challenge)) => Err(GatewayError::new(
                GatewayErrorKind::ChallengeRequired,
                format!("Authentication challenge required: {}", challenge.as_str()),
            )),
            (None, None) => Err(GatewayError::new(
                GatewayErrorKind::Provider,
                "Identity provider returned no ID token",
            )),
        }
    }

    #[instrument(level = "debug", skip(self, code))]
    async fn confirm_registration(
        &self,
        username: &str,
        code: &str,
    ) -> std::result::Result<(), GatewayError> {
        self.client
            .confirm_sign_up()
            .client_id(&self.client_id)
            .username(username)
            .confirmation_code(code)
            .force_alias_creation(true)
            .send()
            .await
            .map_err(|e| provider_error("ConfirmSignUp", e))?;

        Ok(())
    }

    async fn verify_token(&self, token: &str) -> std::result::Result<Claims, GatewayError> {
        self.verifier.verify(token).await
    }
}
