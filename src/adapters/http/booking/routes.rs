//! HTTP routes for booking endpoints.

use axum::{routing::post, Router};

use super::handlers::{create_booking, BookingHandlers};

/// Public booking routes.
pub fn booking_routes(handlers: BookingHandlers) -> Router {
    Router::new()
        .route("/api/bookings", post(create_booking))
        .with_state(handlers)
}
