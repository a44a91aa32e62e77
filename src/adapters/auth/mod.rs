//! Authentication adapters.
//!
//! - `jwt` - HS256 admin session tokens (issue + validate)
//! - `credentials` - Admin login check
//! - `mock` - Test validator that doesn't sign anything

mod credentials;
mod jwt;
mod mock;

pub use credentials::AdminCredentials;
pub use jwt::{IssuedToken, JwtSessionValidator};
pub use mock::MockSessionValidator;
