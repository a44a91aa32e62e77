//! HTTP middleware for axum.
//!
//! - `auth` - Authentication gate, middleware and extractors

pub mod auth;

pub use auth::{auth_error_response, auth_middleware, AuthGate, AuthRejection, AuthState, RequireAuth};
