//! HTTP handlers for booking endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::domain_error_response;
use crate::application::handlers::booking::{CreateBookingCommand, CreateBookingHandler};

use super::dto::{BookingCreatedResponse, CreateBookingRequest};

#[derive(Clone)]
pub struct BookingHandlers {
    create_handler: Arc<CreateBookingHandler>,
}

impl BookingHandlers {
    pub fn new(create_handler: Arc<CreateBookingHandler>) -> Self {
        Self { create_handler }
    }
}

/// POST /api/bookings - Book a tour
pub async fn create_booking(
    State(handlers): State<BookingHandlers>,
    Json(req): Json<CreateBookingRequest>,
) -> Response {
    let cmd = CreateBookingCommand { booking: req.into() };

    match handlers.create_handler.handle(cmd).await {
        Ok(booking) => {
            let response = BookingCreatedResponse {
                id: booking.id().to_string(),
                message: "Booking received".to_string(),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => domain_error_response(e),
    }
}
