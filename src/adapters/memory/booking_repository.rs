//! In-memory booking repository.
//!
//! Keeps bookings in insertion order for the lifetime of the process.
//! Useful for development and tests.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::booking::Booking;
use crate::domain::foundation::{BookingId, DomainError};
use crate::ports::BookingRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryBookingRepository {
    bookings: Arc<RwLock<Vec<Booking>>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored bookings
    pub async fn count(&self) -> usize {
        self.bookings.read().await.len()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn save(&self, booking: &Booking) -> Result<(), DomainError> {
        let mut bookings = self.bookings.write().await;
        match bookings.iter_mut().find(|b| b.id() == booking.id()) {
            Some(existing) => *existing = booking.clone(),
            None => bookings.push(booking.clone()),
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError> {
        Ok(self.bookings.read().await.iter().find(|b| b.id() == id).cloned())
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Booking>, DomainError> {
        Ok(self.bookings.read().await.iter().rev().take(limit).cloned().collect())
    }
}
