//! Booking aggregate.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{BookingId, Timestamp, ValidationError};

/// Unvalidated input for a new booking.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub customer_name: String,
    pub email: String,
    pub tour: String,
    pub travellers: u32,
    pub total_price: f64,
    pub currency_symbol: String,
}

/// A confirmed tour booking request.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    id: BookingId,
    customer_name: String,
    email: String,
    tour: String,
    travellers: u32,
    total_price: f64,
    currency_symbol: String,
    created_at: Timestamp,
}

impl Booking {
    /// Validates the input and creates a booking stamped now.
    pub fn create(input: NewBooking) -> Result<Self, ValidationError> {
        let customer_name = non_empty("name", input.customer_name)?;
        let email = non_empty("email", input.email)?;
        if !email.contains('@') {
            return Err(ValidationError::invalid_format("email", "missing @ symbol"));
        }
        let tour = non_empty("tour", input.tour)?;
        if input.travellers == 0 {
            return Err(ValidationError::out_of_range(
                "travellers",
                1,
                i64::from(u32::MAX),
                0,
            ));
        }
        if !input.total_price.is_finite() || input.total_price < 0.0 {
            return Err(ValidationError::invalid_format(
                "totalPrice",
                "must be a non-negative amount",
            ));
        }
        let currency_symbol = non_empty("currencySymbol", input.currency_symbol)?;

        Ok(Self {
            id: BookingId::new(),
            customer_name,
            email,
            tour,
            travellers: input.travellers,
            total_price: input.total_price,
            currency_symbol,
            created_at: Timestamp::now(),
        })
    }

    pub fn id(&self) -> &BookingId {
        &self.id
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn tour(&self) -> &str {
        &self.tour
    }

    pub fn travellers(&self) -> u32 {
        self.travellers
    }

    pub fn total_price(&self) -> f64 {
        self.total_price
    }

    pub fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Summary pushed to admin notification subscribers.
    pub fn summary(&self) -> BookingSummary {
        BookingSummary {
            id: self.id.to_string(),
            name: self.customer_name.clone(),
            email: self.email.clone(),
            tour: self.tour.clone(),
            travellers: self.travellers,
            total_price: self.total_price,
            currency_symbol: self.currency_symbol.clone(),
            created_at: self.created_at.as_unix_millis(),
        }
    }
}

/// Booking fields shown in the admin notification list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub tour: String,
    pub travellers: u32,
    pub total_price: f64,
    pub currency_symbol: String,
    pub created_at: i64,
}

pub(crate) fn non_empty(field: &str, value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    Ok(trimmed.to_string())
}
