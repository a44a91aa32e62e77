//! Session validation port for admin token validation.
//!
//! This port defines the contract for validating access tokens and extracting
//! the admin identity. It is token-format agnostic: the production adapter
//! checks HS256 JWTs, tests use an in-memory mock.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Validates access tokens and extracts user identity.
///
/// The HTTP auth middleware and the notification stream handshake both
/// call this port.
///
/// # Contract
///
/// Implementations must:
/// - Validate the token signature and expiry
/// - Return `AuthError::InvalidToken` for malformed/bad signature tokens
/// - Return `AuthError::TokenExpired` for expired tokens
/// - Return `AuthError::ServiceUnavailable` when validation itself cannot run
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a raw access token (without any "Bearer " prefix).
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
