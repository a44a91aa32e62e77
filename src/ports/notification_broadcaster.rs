//! NotificationBroadcaster port - producer-facing side of the admin
//! notification pipeline.
//!
//! Booking and review handlers call this after persisting a new record. The
//! call is synchronous and infallible: delivery is best-effort and a missing
//! audience (zero connected admins) is not an error.

use crate::domain::notifications::NotificationType;

/// Port for announcing domain events to connected admin sessions.
///
/// # Contract
///
/// Implementations must:
/// - Never block on a slow subscriber
/// - Never panic or surface delivery failures to the caller
/// - Preserve call order per subscriber
pub trait NotificationBroadcaster: Send + Sync {
    /// Announce an event with an arbitrary JSON payload.
    fn notify(&self, kind: NotificationType, payload: serde_json::Value);
}
