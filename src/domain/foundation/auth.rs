//! Authentication types for the domain layer.
//!
//! These types represent an authenticated admin extracted from a validated
//! token. They have no dependency on the token format; any
//! `SessionValidator` implementation can populate them.

use super::UserId;
use thiserror::Error;

/// Authenticated admin principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Identifier from the token subject.
    pub id: UserId,

    /// Display name if the token carried one.
    pub display_name: Option<String>,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    pub fn new(id: UserId, display_name: Option<String>) -> Self {
        Self { id, display_name }
    }

    /// Principal used when the development auth bypass admits a request.
    pub fn local_developer() -> Self {
        Self {
            id: UserId::local_dev(),
            display_name: Some("Local Developer".to_string()),
        }
    }

    /// Returns the display name, or the user id as fallback.
    pub fn display_name_or_id(&self) -> &str {
        self.display_name.as_deref().unwrap_or(self.id.as_str())
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No credential was presented.
    #[error("Authentication required")]
    MissingCredentials,

    /// The token is malformed or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// Username or password did not match.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The validator could not do its job (misconfiguration, key problems).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if the caller should obtain a new credential.
    pub fn requires_reauthentication(&self) -> bool {
        !matches!(self, AuthError::ServiceUnavailable(_))
    }
}
