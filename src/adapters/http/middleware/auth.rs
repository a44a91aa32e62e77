//! Authentication middleware and extractors for axum.
//!
//! This module provides:
//! - `AuthGate` - Credential extraction (Bearer header or session cookie) and validation
//! - `auth_middleware` - Layer that validates credentials and injects user into extensions
//! - `RequireAuth` - Extractor that requires authentication
//!
//! # Architecture
//!
//! The gate uses the `SessionValidator` port, keeping it token-format agnostic.
//!
//! ```text
//! Request → auth_middleware → injects AuthenticatedUser into extensions
//!                                      ↓
//!                              Handler → RequireAuth extractor reads from extensions
//! ```
//!
//! The notification stream does not sit behind the middleware; it calls
//! [`AuthGate::authenticate`] itself so it can drive its own lifecycle.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::SessionValidator;

/// Validator plus the rules for finding a credential on a request.
#[derive(Clone)]
pub struct AuthGate {
    validator: Arc<dyn SessionValidator>,
    cookie_name: String,
    bypass: bool,
}

/// Auth middleware state.
pub type AuthState = Arc<AuthGate>;

impl AuthGate {
    pub fn new(validator: Arc<dyn SessionValidator>, cookie_name: impl Into<String>) -> Self {
        Self {
            validator,
            cookie_name: cookie_name.into(),
            bypass: false,
        }
    }

    /// Admits every request as the local developer. Callers decide whether
    /// the environment allows it.
    pub fn with_bypass(mut self, bypass: bool) -> Self {
        self.bypass = bypass;
        self
    }

    pub fn bypass_active(&self) -> bool {
        self.bypass
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Finds the presented credential.
    ///
    /// `Authorization: Bearer <token>` wins over the session cookie.
    pub fn credential<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        let bearer = headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty());

        bearer.or_else(|| self.cookie_value(headers))
    }

    fn cookie_value<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .find_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                (name == self.cookie_name && !value.is_empty()).then_some(value)
            })
    }

    /// Resolves the admin behind a request.
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<AuthenticatedUser, AuthError> {
        if self.bypass {
            return Ok(AuthenticatedUser::local_developer());
        }
        let token = self.credential(headers).ok_or(AuthError::MissingCredentials)?;
        self.validator.validate(token).await
    }
}

/// Maps an auth failure to the JSON error response.
pub fn auth_error_response(error: &AuthError) -> Response {
    let (status, message) = match error {
        AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired"),
        AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
        AuthError::MissingCredentials => (StatusCode::UNAUTHORIZED, "Authentication required"),
        AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
        AuthError::ServiceUnavailable(msg) => {
            tracing::error!("Auth service unavailable: {}", msg);
            (StatusCode::SERVICE_UNAVAILABLE, "Authentication service unavailable")
        }
    };

    (
        status,
        Json(serde_json::json!({
            "error": message,
            "code": "AUTH_ERROR"
        })),
    )
        .into_response()
}

/// Authentication middleware.
///
/// This middleware:
/// 1. Admits the local developer when the bypass is active
/// 2. Extracts the credential (Bearer header, then session cookie)
/// 3. Validates it using the `SessionValidator` port
/// 4. On success, injects `AuthenticatedUser` into request extensions
/// 5. On missing credential, continues without injecting (`RequireAuth` rejects later)
/// 6. On invalid credential, returns 401 Unauthorized
pub async fn auth_middleware(State(gate): State<AuthState>, mut request: Request, next: Next) -> Response {
    if gate.bypass_active() {
        request.extensions_mut().insert(AuthenticatedUser::local_developer());
        return next.run(request).await;
    }

    let token = gate.credential(request.headers()).map(str::to_owned);
    match token {
        Some(token) => match gate.validator.validate(&token).await {
            Ok(user) => {
                request.extensions_mut().insert(user);
                next.run(request).await
            }
            Err(e) => auth_error_response(&e),
        },
        None => next.run(request).await,
    }
}

/// Extractor that requires authentication.
///
/// If no user is in the request extensions (the auth middleware didn't
/// validate a credential), returns 401 Unauthorized.
///
/// # Example
///
/// ```ignore
/// async fn my_handler(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", user.display_name_or_id())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(RequireAuth)
            .ok_or(AuthRejection::Unauthenticated)
    }
}

/// Rejection type for authentication failures.
#[derive(Debug, Clone)]
pub enum AuthRejection {
    /// No valid authentication credential was provided.
    Unauthenticated,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthRejection::Unauthenticated => (StatusCode::UNAUTHORIZED, "Authentication required"),
        };

        (
            status,
            Json(serde_json::json!({
                "error": message,
                "code": "UNAUTHENTICATED"
            })),
        )
            .into_response()
    }
}
