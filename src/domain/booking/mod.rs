//! Booking domain.

mod aggregate;

pub use aggregate::{Booking, BookingSummary, NewBooking};
pub(crate) use aggregate::non_empty;
