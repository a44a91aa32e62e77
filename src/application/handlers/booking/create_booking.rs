//! CreateBookingHandler - Command handler for new tour bookings.

use std::sync::Arc;

use crate::domain::booking::{Booking, NewBooking};
use crate::domain::foundation::DomainError;
use crate::domain::notifications::NotificationType;
use crate::ports::{BookingRepository, NotificationBroadcaster};

/// Command to book a tour.
#[derive(Debug, Clone)]
pub struct CreateBookingCommand {
    pub booking: NewBooking,
}

/// Handler for creating bookings.
pub struct CreateBookingHandler {
    repository: Arc<dyn BookingRepository>,
    broadcaster: Arc<dyn NotificationBroadcaster>,
}

impl CreateBookingHandler {
    pub fn new(repository: Arc<dyn BookingRepository>, broadcaster: Arc<dyn NotificationBroadcaster>) -> Self {
        Self {
            repository,
            broadcaster,
        }
    }

    pub async fn handle(&self, cmd: CreateBookingCommand) -> Result<Booking, DomainError> {
        // 1. Validate and build the aggregate
        let booking = Booking::create(cmd.booking)?;

        // 2. Persist
        self.repository.save(&booking).await?;

        // 3. Tell connected admins; never fails the request
        match serde_json::to_value(booking.summary()) {
            Ok(payload) => self.broadcaster.notify(NotificationType::Booking, payload),
            Err(e) => tracing::error!(booking_id = %booking.id(), error = %e, "Failed to encode booking notification"),
        }

        tracing::info!(booking_id = %booking.id(), tour = booking.tour(), "Booking created");
        Ok(booking)
    }
}
