//! Admin username/password check used by the login route.

use secrecy::{ExposeSecret, Secret};
use subtle::ConstantTimeEq;

use crate::config::AuthConfig;
use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};

/// The single configured admin account.
pub struct AdminCredentials {
    username: String,
    password: Secret<String>,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: Secret<String>) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.admin_username.clone(),
            Secret::new(config.admin_password.clone()),
        )
    }

    /// Checks a login attempt.
    ///
    /// Both fields are compared in constant time and both comparisons always
    /// run, so timing does not reveal which one was wrong.
    pub fn verify(&self, username: &str, password: &str) -> Result<AuthenticatedUser, AuthError> {
        let user_ok = self.username.as_bytes().ct_eq(username.as_bytes());
        let pass_ok = self
            .password
            .expose_secret()
            .as_bytes()
            .ct_eq(password.as_bytes());

        if bool::from(user_ok & pass_ok) {
            let id = UserId::new(self.username.as_str()).map_err(|_| AuthError::InvalidCredentials)?;
            Ok(AuthenticatedUser::new(id, Some("Administrator".to_string())))
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
