//! HS256 session tokens for the admin panel.
//!
//! The same component issues tokens at login and validates them on every
//! protected request, so a single shared secret is enough. Tokens carry the
//! admin identity in `sub` and are rejected once `exp` has passed.

use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::domain::foundation::{AuthError, AuthenticatedUser, Timestamp, UserId};
use crate::ports::SessionValidator;

/// Claims carried by an admin session token.
#[derive(Debug, Serialize, Deserialize)]
struct AdminClaims {
    sub: String,
    iss: String,
    iat: i64,
    exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

/// A freshly signed token and its expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: Timestamp,
}

/// Issues and validates admin session tokens signed with a shared secret.
pub struct JwtSessionValidator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    token_ttl: Duration,
}

impl JwtSessionValidator {
    pub fn new(secret: &Secret<String>, issuer: impl Into<String>, token_ttl: Duration) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            issuer: issuer.into(),
            token_ttl,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            &Secret::new(config.jwt_secret.clone()),
            config.jwt_issuer.clone(),
            config.token_ttl(),
        )
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Signs a token for `user` that expires after the configured TTL.
    pub fn issue(&self, user: &AuthenticatedUser) -> Result<IssuedToken, AuthError> {
        let issued_at = Timestamp::now();
        let expires_at = issued_at.plus_secs(self.token_ttl.as_secs());
        let claims = AdminClaims {
            sub: user.id.as_str().to_string(),
            iss: self.issuer.clone(),
            iat: issued_at.as_unix_secs(),
            exp: expires_at.as_unix_secs(),
            name: user.display_name.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to sign admin token: {}", e);
            AuthError::service_unavailable("token signing failed")
        })?;

        Ok(IssuedToken { token, expires_at })
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<AdminClaims>(token, &self.decoding_key, &self.validation()).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Admin token expired");
                    AuthError::TokenExpired
                }
                ErrorKind::InvalidIssuer => {
                    tracing::warn!("Invalid issuer in admin token");
                    AuthError::InvalidToken
                }
                _ => {
                    tracing::debug!("Admin token validation failed: {}", e);
                    AuthError::InvalidToken
                }
            }
        })?;

        let id = UserId::new(data.claims.sub).map_err(|_| AuthError::InvalidToken)?;
        Ok(AuthenticatedUser::new(id, data.claims.name))
    }
}

impl std::fmt::Debug for JwtSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSessionValidator")
            .field("issuer", &self.issuer)
            .field("token_ttl", &self.token_ttl)
            .finish_non_exhaustive()
    }
}
