//! Bearer token verification against the user pool's published signing keys
//!
//! Tokens are RS256 JWTs. The key set is fetched from the pool's JWKS endpoint and
//! cached; a token is accepted when its signature verifies, it was issued by the
//! configured pool, it was minted for the configured app client, and it has not expired.

use jsonwebtoken::{decode, decode_header, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::{GatewayError, GatewayErrorKind};

/// JSON Web Key Set structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwkSet {
    pub keys: Vec<Jwk>,
}

/// JSON Web Key structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jwk {
    pub kty: String,
    pub kid: Option<String>,
    pub alg: Option<String>,
    pub r#use: Option<String>,
    pub n: Option<String>,
    pub e: Option<String>,
    #[serde(flatten)]
    pub other: HashMap<String, Value>,
}

/// Claims carried by pool-issued ID and access tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user pool user id)
    pub sub: String,
    /// Issuer (the user pool URL)
    pub iss: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// `id` or `access`
    #[serde(default)]
    pub token_use: Option<String>,
    /// App client id (ID tokens)
    #[serde(default)]
    pub aud: Option<String>,
    /// App client id (access tokens)
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "cognito:username")]
    pub username: Option<String>,
    /// Remaining claims
    #[serde(flatten)]
    pub custom: HashMap<String, Value>,
}

impl Claims {
    /// App client the token was minted for, whichever token type it is
    pub fn app_client_id(&self) -> Option<&str> {
        self.client_id.as_deref().or(self.aud.as_deref())
    }
}

/// Verifies pool-issued bearer tokens, caching the key set per JWKS URL
#[derive(Clone)]
pub struct TokenVerifier {
    http_client: reqwest::Client,
    jwks_url: String,
    issuer: String,
    client_id: String,
    leeway: Duration,
    jwks_cache: Cache<String, Arc<JwkSet>>,
}

impl TokenVerifier {
    pub fn new(
        http_client: reqwest::Client,
        jwks_url: String,
        issuer: String,
        client_id: String,
        cache_ttl: Duration,
        leeway: Duration,
    ) -> Self {
        Self {
            http_client,
            jwks_url,
            issuer,
            client_id,
            leeway,
            jwks_cache: Cache::builder()
                .time_to_live(cache_ttl)
                .max_capacity(4)
                .build(),
        }
    }

    /// Verify `token` and return its claims
    #[instrument(level = "debug", skip_all)]
    pub async fn verify(&self, token: &str) -> Result<Claims, GatewayError> {
        let header = decode_header(token)
            .map_err(|e| GatewayError::invalid_token(format!("Malformed token header: {e}")))?;

        let key_id = header
            .kid
            .ok_or_else(|| GatewayError::invalid_token("Token header missing key ID (kid)"))?;

        let jwks = self.fetch_jwks().await?;

        let jwk = jwks
            .keys
            .iter()
            .find(|k| k.kid.as_deref() == Some(key_id.as_str()))
            .ok_or_else(|| {
                GatewayError::invalid_token(format!("No signing key matches key ID {key_id}"))
            })?;

        let decoding_key = decoding_key(jwk)?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        // `aud` is only present on ID tokens; the client is checked below for both kinds
        validation.validate_aud = false;
        validation.leeway = self.leeway.as_secs();

        let claims = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => GatewayError::invalid_token("Token has expired"),
                ErrorKind::InvalidIssuer => {
                    GatewayError::invalid_token("Token issued by an unexpected issuer")
                }
                _ => GatewayError::invalid_token(format!("Token validation failed: {e}")),
            })?
            .claims;

        if claims.app_client_id() != Some(self.client_id.as_str()) {
            warn!(
                "Token minted for client {:?}, expected {}",
                claims.app_client_id(),
                self.client_id
            );
            return Err(GatewayError::invalid_token(
                "Token was not issued for this client",
            ));
        }

        match claims.token_use.as_deref() {
            Some("id") | Some("access") => {}
            other => {
                return Err(GatewayError::invalid_token(format!(
                    "Unsupported token_use {other:?}"
                )))
            }
        }

        debug!("Token verified for subject {}", claims.sub);
        Ok(claims)
    }

    /// Fetch the pool's key set, serving from cache while it is fresh
    pub async fn fetch_jwks(&self) -> Result<Arc<JwkSet>, GatewayError> {
        if let Some(cached) = self.jwks_cache.get(&self.jwks_url).await {
            debug!("Using cached JWKS for {}", self.jwks_url);
            return Ok(cached);
        }

        debug!("Fetching JWKS from {}", self.jwks_url);

        let response = self.http_client.get(&self.jwks_url).send().await?;

        if !response.status().is_success() {
            return Err(GatewayError::new(
                GatewayErrorKind::Provider,
                format!("JWKS endpoint returned {}", response.status()),
            ));
        }

        let jwks: JwkSet = response.json().await.map_err(|e| {
            GatewayError::new(
                GatewayErrorKind::Provider,
                format!("Failed to parse JWKS: {e}"),
            )
        })?;

        if jwks.keys.is_empty() {
            return Err(GatewayError::new(
                GatewayErrorKind::Provider,
                "JWKS contains no keys",
            ));
        }

        debug!("Fetched JWKS with {} keys", jwks.keys.len());

        let jwks = Arc::new(jwks);
        self.jwks_cache
            .insert(self.jwks_url.clone(), jwks.clone())
            .await;

        Ok(jwks)
    }
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("jwks_url", &self.jwks_url)
            .field("issuer", &self.issuer)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

fn decoding_key(jwk: &Jwk) -> Result<DecodingKey, GatewayError> {
    if jwk.kty != "RSA" {
        return Err(GatewayError::invalid_token(format!(
            "Unsupported key type: {}",
            jwk.kty
        )));
    }

    let (Some(n), Some(e)) = (jwk.n.as_deref(), jwk.e.as_deref()) else {
        return Err(GatewayError::new(
            GatewayErrorKind::Provider,
            "RSA key is missing its modulus or exponent",
        ));
    };

    DecodingKey::from_rsa_components(n, e).map_err(|err| {
        GatewayError::new(
            GatewayErrorKind::Provider,
            format!("Unusable RSA key: {err}"),
        )
    })
}
