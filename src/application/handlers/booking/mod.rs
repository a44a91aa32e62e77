//! Booking command and query handlers.

mod create_booking;
mod list_bookings;

pub use create_booking::{CreateBookingCommand, CreateBookingHandler};
pub use list_bookings::{ListBookingsHandler, ListBookingsQuery, MAX_BOOKINGS_PAGE};
