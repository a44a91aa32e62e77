//! ListBookingsHandler - Query handler for the admin booking list.

use std::sync::Arc;

use crate::domain::booking::BookingSummary;
use crate::domain::foundation::DomainError;
use crate::ports::BookingRepository;

/// Upper bound on a single page of bookings.
pub const MAX_BOOKINGS_PAGE: usize = 200;

#[derive(Debug, Clone, Copy)]
pub struct ListBookingsQuery {
    pub limit: usize,
}

pub struct ListBookingsHandler {
    repository: Arc<dyn BookingRepository>,
}

impl ListBookingsHandler {
    pub fn new(repository: Arc<dyn BookingRepository>) -> Self {
        Self { repository }
    }

    /// Newest bookings first, at most `MAX_BOOKINGS_PAGE`.
    pub async fn handle(&self, query: ListBookingsQuery) -> Result<Vec<BookingSummary>, DomainError> {
        let limit = query.limit.clamp(1, MAX_BOOKINGS_PAGE);
        let bookings = self.repository.list_recent(limit).await?;
        Ok(bookings.iter().map(|b| b.summary()).collect())
    }
}
