//! Shared test doubles for handler tests.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::booking::Booking;
use crate::domain::foundation::{BookingId, DomainError, ReviewId};
use crate::domain::notifications::NotificationType;
use crate::domain::review::Review;
use crate::ports::{BookingRepository, NotificationBroadcaster, ReviewRepository};

/// Records every notification instead of sending it.
#[derive(Default)]
pub struct RecordingBroadcaster {
    sent: Mutex<Vec<(NotificationType, Value)>>,
}

impl RecordingBroadcaster {
    pub fn sent(&self) -> Vec<(NotificationType, Value)> {
        self.sent.lock().unwrap().clone()
    }
}

impl NotificationBroadcaster for RecordingBroadcaster {
    fn notify(&self, kind: NotificationType, payload: Value) {
        self.sent.lock().unwrap().push((kind, payload));
    }
}

fn simulated_failure() -> DomainError {
    DomainError::storage("Simulated save failure")
}

pub struct FailingBookingRepository;

#[async_trait]
impl BookingRepository for FailingBookingRepository {
    async fn save(&self, _booking: &Booking) -> Result<(), DomainError> {
        Err(simulated_failure())
    }

    async fn find_by_id(&self, _id: &BookingId) -> Result<Option<Booking>, DomainError> {
        Err(simulated_failure())
    }

    async fn list_recent(&self, _limit: usize) -> Result<Vec<Booking>, DomainError> {
        Err(simulated_failure())
    }
}

pub struct FailingReviewRepository;

#[async_trait]
impl ReviewRepository for FailingReviewRepository {
    async fn save(&self, _review: &Review) -> Result<(), DomainError> {
        Err(simulated_failure())
    }

    async fn find_by_id(&self, _id: &ReviewId) -> Result<Option<Review>, DomainError> {
        Err(simulated_failure())
    }

    async fn list_recent(&self, _limit: usize) -> Result<Vec<Review>, DomainError> {
        Err(simulated_failure())
    }
}
