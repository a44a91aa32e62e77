//! Booking repository port.

use async_trait::async_trait;

use crate::domain::booking::Booking;
use crate::domain::foundation::{BookingId, DomainError};

/// Repository port for Booking persistence.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Save a new booking.
    ///
    /// # Errors
    ///
    /// - `StorageFailure` when the store cannot complete the call
    async fn save(&self, booking: &Booking) -> Result<(), DomainError>;

    /// Find a booking by its ID.
    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError>;

    /// Most recent bookings first, at most `limit`.
    async fn list_recent(&self, limit: usize) -> Result<Vec<Booking>, DomainError>;
}
