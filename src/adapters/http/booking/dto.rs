//! HTTP DTOs for booking endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::booking::{BookingSummary, NewBooking};

/// Booking form submission.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub name: String,
    pub email: String,
    pub tour: String,
    pub travellers: u32,
    pub total_price: f64,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_currency_symbol() -> String {
    "€".to_string()
}

impl From<CreateBookingRequest> for NewBooking {
    fn from(req: CreateBookingRequest) -> Self {
        NewBooking {
            customer_name: req.name,
            email: req.email,
            tour: req.tour,
            travellers: req.travellers,
            total_price: req.total_price,
            currency_symbol: req.currency_symbol,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingCreatedResponse {
    pub id: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingListResponse {
    pub items: Vec<BookingSummary>,
    pub total: usize,
}
