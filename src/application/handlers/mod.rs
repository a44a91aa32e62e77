//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod booking;
pub mod review;

#[cfg(test)]
pub(crate) mod test_support;

pub use booking::{CreateBookingCommand, CreateBookingHandler, ListBookingsHandler, ListBookingsQuery};
pub use review::{CreateReviewCommand, CreateReviewHandler, ListReviewsHandler, ListReviewsQuery};
