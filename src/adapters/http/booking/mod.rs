//! HTTP adapter for booking endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{BookingCreatedResponse, BookingListResponse, CreateBookingRequest};
pub use handlers::BookingHandlers;
pub use routes::booking_routes;
