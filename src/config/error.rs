//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid host/port combination: {0}")]
    InvalidSocketAddr(String),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("JWT secret must be at least {0} bytes")]
    JwtSecretTooShort(usize),

    #[error("Token TTL must be between 60 seconds and 7 days")]
    InvalidTokenTtl,

    #[error("Invalid cookie name")]
    InvalidCookieName,

    #[error("Auth bypass is not allowed in production")]
    BypassInProduction,

    #[error("Notification channel capacity must be between 1 and 10000")]
    InvalidChannelCapacity,

    #[error("Keep-alive interval must be between 1 and 300 seconds")]
    InvalidKeepAlive,
}
