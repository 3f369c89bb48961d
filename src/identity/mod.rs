//! Caller identity, resolved from the external provider's session token.
//!
//! The provider issues signed session JWTs; we verify them locally with the
//! shared secret and only go back over the network for metadata writes
//! (flipping the `has_profile` flag after onboarding).

use async_trait::async_trait;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::config;

/// Per-request caller context, passed explicitly into every action.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub token: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self { token: None }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }
}

/// The authenticated caller as the provider knows them.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    /// Provider-stable user id; the owner key for every write.
    pub id: String,
    pub email: String,
    pub image_url: String,
    pub has_profile: bool,
}

/// Claims carried by a provider session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub has_profile: bool,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Identity provider secret not configured")]
    MissingSecret,

    #[error("Invalid session token: {0}")]
    InvalidToken(String),

    #[error("Identity provider request failed: {0}")]
    Provider(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve the current caller, if the session carries a valid token.
    async fn current_user(&self, session: &Session) -> Result<Option<Identity>, IdentityError>;

    /// Record on the provider side that the caller finished onboarding.
    async fn mark_profile_complete(&self, user_id: &str) -> Result<(), IdentityError>;
}

/// Production provider: local JWT verification plus the provider's REST API
/// for metadata writes.
pub struct JwtIdentityProvider {
    http: reqwest::Client,
}

impl JwtIdentityProvider {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    fn decode_session(token: &str) -> Result<SessionClaims, IdentityError> {
        let secret = &config::config().identity.jwt_secret;
        if secret.is_empty() {
            return Err(IdentityError::MissingSecret);
        }

        let decoding_key = DecodingKey::from_secret(secret.as_bytes());
        let validation = Validation::default();

        let token_data = decode::<SessionClaims>(token, &decoding_key, &validation)
            .map_err(|e| IdentityError::InvalidToken(e.to_string()))?;
        Ok(token_data.claims)
    }
}

impl Default for JwtIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn current_user(&self, session: &Session) -> Result<Option<Identity>, IdentityError> {
        let token = match session.token.as_deref() {
            Some(t) if !t.trim().is_empty() => t,
            _ => return Ok(None),
        };

        match Self::decode_session(token) {
            Ok(claims) => Ok(Some(Identity {
                id: claims.sub,
                email: claims.email,
                image_url: claims.image_url,
                has_profile: claims.has_profile,
            })),
            // An expired or tampered token is an anonymous caller, not a fault.
            Err(IdentityError::InvalidToken(reason)) => {
                tracing::debug!("rejected session token: {}", reason);
                Ok(None)
            }
            Err(other) => Err(other),
        }
    }

    async fn mark_profile_complete(&self, user_id: &str) -> Result<(), IdentityError> {
        let identity = &config::config().identity;
        let url = format!("{}/users/{}/metadata", identity.api_url, user_id);

        let response = self
            .http
            .patch(&url)
            .bearer_auth(&identity.api_key)
            .json(&json!({ "private_metadata": { "has_profile": true } }))
            .send()
            .await
            .map_err(|e| IdentityError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            return Err(IdentityError::Provider(format!(
                "metadata update returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}
