//! Typed configuration for the travel desk server.
//!
//! Values come from `TRAVEL_DESK__<SECTION>__<KEY>` environment variables,
//! with a `.env` file read first when present:
//!
//! ```text
//! TRAVEL_DESK__SERVER__PORT=8080
//! TRAVEL_DESK__SERVER__ENVIRONMENT=production
//! TRAVEL_DESK__AUTH__JWT_SECRET=<at least 32 bytes>
//! TRAVEL_DESK__AUTH__ADMIN_PASSWORD=...
//! TRAVEL_DESK__NOTIFICATIONS__KEEP_ALIVE_SECS=15
//! ```
//!
//! `server` and `notifications` are optional; `auth` must be present.
//!
//! ```no_run
//! use travel_desk::config::AppConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load()?;
//! config.validate()?;
//! # Ok(())
//! # }
//! ```

mod auth;
mod error;
mod notifications;
mod server;

pub use auth::AuthConfig;
pub use error::{ConfigError, ValidationError};
pub use notifications::NotificationsConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

const ENV_PREFIX: &str = "TRAVEL_DESK";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    pub auth: AuthConfig,

    #[serde(default)]
    pub notifications: NotificationsConfig,
}

impl AppConfig {
    /// Reads `.env` (if any) and the process environment.
    ///
    /// Only fails on missing sections or unparseable values; call
    /// [`validate`](Self::validate) for semantic checks.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator(ENV_SEPARATOR))
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.auth.validate(&self.server.environment)?;
        self.notifications.validate()
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }

    /// Whether unauthenticated admin access is in effect.
    pub fn auth_bypass_active(&self) -> bool {
        self.auth.bypass_active(&self.server.environment)
    }
}
