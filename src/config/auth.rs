//! Authentication configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

const MIN_SECRET_BYTES: usize = 32;

/// Admin authentication configuration
#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for admin session tokens
    pub jwt_secret: String,

    /// `iss` claim written to and expected on tokens
    #[serde(default = "default_issuer")]
    pub jwt_issuer: String,

    /// Session token lifetime in seconds
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,

    /// Cookie carrying the session token for browser clients
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    #[serde(default = "default_admin_username")]
    pub admin_username: String,

    pub admin_password: String,

    /// Skip authentication on the notification stream and admin routes.
    /// Development only.
    #[serde(default)]
    pub dev_bypass: bool,
}

impl AuthConfig {
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }

    /// Whether the bypass is actually in effect for this environment.
    pub fn bypass_active(&self, environment: &Environment) -> bool {
        self.dev_bypass && environment.is_development()
    }

    /// Validate authentication configuration
    ///
    /// Production refuses the bypass flag outright instead of ignoring it.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.jwt_secret.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"));
        }
        if self.jwt_secret.len() < MIN_SECRET_BYTES {
            return Err(ValidationError::JwtSecretTooShort(MIN_SECRET_BYTES));
        }
        if self.admin_username.trim().is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__ADMIN_USERNAME"));
        }
        if self.admin_password.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__ADMIN_PASSWORD"));
        }
        if !(60..=7 * 24 * 3600).contains(&self.token_ttl_secs) {
            return Err(ValidationError::InvalidTokenTtl);
        }
        if self.cookie_name.is_empty()
            || !self
                .cookie_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ValidationError::InvalidCookieName);
        }
        if self.dev_bypass && *environment == Environment::Production {
            return Err(ValidationError::BypassInProduction);
        }
        Ok(())
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_issuer", &self.jwt_issuer)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("cookie_name", &self.cookie_name)
            .field("admin_username", &self.admin_username)
            .field("admin_password", &"[REDACTED]")
            .field("dev_bypass", &self.dev_bypass)
            .finish()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_issuer: default_issuer(),
            token_ttl_secs: default_token_ttl(),
            cookie_name: default_cookie_name(),
            admin_username: default_admin_username(),
            admin_password: String::new(),
            dev_bypass: false,
        }
    }
}

fn default_issuer() -> String {
    "travel-desk".to_string()
}

fn default_token_ttl() -> u64 {
    8 * 3600
}

fn default_cookie_name() -> String {
    "admin_token".to_string()
}

fn default_admin_username() -> String {
    "admin".to_string()
}
