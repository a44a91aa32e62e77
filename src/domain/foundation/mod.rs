//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types that form the
//! vocabulary of the Travel Desk domain.

mod auth;
mod errors;
mod ids;
mod star_rating;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{BookingId, ConnectionId, ReviewId, UserId};
pub use star_rating::StarRating;
pub use state_machine::{InvalidTransition, StateMachine};
pub use timestamp::Timestamp;
