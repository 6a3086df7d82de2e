//! Cognito user pool configuration

use authgate_common::ConfigurationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Shape of a user pool id: `<region>_<id>`
static USER_POOL_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w-]+_[0-9a-zA-Z]+$").expect("valid user pool id regex"));

/// Cognito user pool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CognitoConfig {
    /// User pool id, e.g. `eu-west-1_AbCdEf123`
    pub user_pool_id: String,

    /// App client id (must allow `USER_PASSWORD_AUTH` and have no secret)
    pub client_id: String,

    /// AWS region; derived from the user pool id when absent
    pub region: Option<String>,

    /// Identity provider API endpoint override
    pub endpoint: Option<String>,

    /// Token issuer override; the JWKS document is read from `{issuer}/.well-known/jwks.json`
    pub issuer: Option<String>,

    /// Timeout for a single provider call, in seconds
    pub gateway_timeout: u64,

    /// How long fetched signing keys are kept, in seconds
    pub jwks_cache_ttl: u64,

    /// Leeway applied to `exp`/`nbf`, in seconds
    pub allowed_clock_skew: u64,
}

impl Default for CognitoConfig {
    fn default() -> Self {
        Self {
            user_pool_id: String::new(),
            client_id: String::new(),
            region: None,
            endpoint: None,
            issuer: None,
            gateway_timeout: 10,
            jwks_cache_ttl: 3600,
            allowed_clock_skew: 60,
        }
    }
}

impl CognitoConfig {
    /// Region the pool lives in
    pub fn region(&self) -> Option<String> {
        if let Some(region) = self.region.as_ref().filter(|r| !r.is_empty()) {
            return Some(region.clone());
        }

        self.user_pool_id
            .split_once('_')
            .map(|(region, _)| region.to_string())
            .filter(|r| !r.is_empty())
    }

    /// Bound on a single provider call
    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_secs(self.gateway_timeout)
    }

    /// How long a fetched key set stays cached
    pub fn jwks_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.jwks_cache_ttl)
    }

    /// Leeway for `exp` checks
    pub fn allowed_clock_skew(&self) -> Duration {
        Duration::from_secs(self.allowed_clock_skew)
    }

    /// Identity provider API endpoint
    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!(
                "https://cognito-idp.{}.amazonaws.com",
                self.region().unwrap_or_default()
            ),
        }
    }

    /// Expected `iss` claim of tokens issued by the pool
    pub fn issuer_url(&self) -> String {
        match &self.issuer {
            Some(issuer) => issuer.trim_end_matches('/').to_string(),
            None => format!(
                "https://cognito-idp.{}.amazonaws.com/{}",
                self.region().unwrap_or_default(),
                self.user_pool_id
            ),
        }
    }

    /// Location of the pool's public signing keys
    pub fn jwks_url(&self) -> String {
        format!("{}/.well-known/jwks.json", self.issuer_url())
    }

    /// Reject configurations the service cannot start with
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.user_pool_id.trim().is_empty() {
            return Err(ConfigurationError::MissingValue {
                key: "cognito.user_pool_id".to_string(),
            });
        }

        if self.client_id.trim().is_empty() {
            return Err(ConfigurationError::MissingValue {
                key: "cognito.client_id".to_string(),
            });
        }

        if !USER_POOL_ID.is_match(&self.user_pool_id) {
            return Err(ConfigurationError::InvalidValue {
                key: "cognito.user_pool_id".to_string(),
                reason: format!("'{}' is not of the form <region>_<id>", self.user_pool_id),
            });
        }

        if self.gateway_timeout == 0 {
            return Err(ConfigurationError::InvalidValue {
                key: "cognito.gateway_timeout".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}
