//! Fan-out of admin notifications to every live stream.
//!
//! # Flow
//!
//! ```text
//! Producer (booking / review handler)
//!          │ notify(kind, payload)
//!          ▼
//! ┌────────────────────┐
//! │ NotificationHub    │  build envelope, serialize once
//! └────────────────────┘
//!          │ snapshot()
//!          ▼
//! ┌────────────────────┐
//! │ ConnectionRegistry │  try_send to each connection
//! └────────────────────┘
//!          │
//!   Ok ────┼──── Full: drop for that connection only
//!          │
//!        Closed: prune from registry
//! ```
//!
//! Broadcasting never blocks and never fails toward the producer. A slow
//! admin tab loses events instead of holding up a booking request.

use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;

use crate::domain::foundation::Timestamp;
use crate::domain::notifications::{EventEnvelope, NotificationType};
use crate::ports::NotificationBroadcaster;

use super::registry::{ConnectionRegistry, DeliveryError, Frame};

/// Outcome counts for a single broadcast.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Connections that accepted the frame.
    pub delivered: usize,
    /// Live connections whose buffer was full.
    pub dropped: usize,
    /// Dead connections removed from the registry.
    pub pruned: usize,
}

impl BroadcastReport {
    pub fn attempted(&self) -> usize {
        self.delivered + self.dropped + self.pruned
    }
}

/// Broadcaster backed by the connection registry.
pub struct NotificationHub {
    registry: Arc<ConnectionRegistry>,
    // Serializes fan-out so concurrent broadcasts reach every connection
    // in the same relative order. Held only for non-blocking sends.
    fanout: Mutex<()>,
}

impl NotificationHub {
    /// Create a hub over the given registry.
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self {
            registry,
            fanout: Mutex::new(()),
        }
    }

    /// Create as an Arc (for sharing with producers and the stream route).
    pub fn new_shared(registry: Arc<ConnectionRegistry>) -> Arc<Self> {
        Arc::new(Self::new(registry))
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Stamps `payload` into an envelope and sends it to every registered
    /// connection.
    ///
    /// The timestamp is taken under the fan-out lock, so on every
    /// connection timestamps never decrease.
    pub fn broadcast(&self, kind: NotificationType, payload: Value) -> BroadcastReport {
        let _order = self.fanout.lock().unwrap_or_else(PoisonError::into_inner);
        let envelope = EventEnvelope::new(kind, payload, Timestamp::now());
        self.fan_out(&envelope)
    }

    /// Sends a prepared envelope to every registered connection.
    ///
    /// The envelope keeps the caller's timestamp, which may be older than
    /// one already delivered.
    pub fn broadcast_envelope(&self, envelope: &EventEnvelope) -> BroadcastReport {
        let _order = self.fanout.lock().unwrap_or_else(PoisonError::into_inner);
        self.fan_out(envelope)
    }

    /// Caller must hold `fanout`.
    fn fan_out(&self, envelope: &EventEnvelope) -> BroadcastReport {
        let frame: Frame = match envelope.to_json() {
            Ok(json) => Arc::from(json),
            Err(e) => {
                tracing::error!(
                    event_type = %envelope.event_type,
                    error = %e,
                    "Failed to serialize notification envelope"
                );
                return BroadcastReport::default();
            }
        };

        let mut report = BroadcastReport::default();
        let targets = self.registry.snapshot();
        if targets.is_empty() {
            tracing::trace!(event_type = %envelope.event_type, "No admin connections, notification discarded");
            return report;
        }

        for connection in targets {
            match connection.deliver(frame.clone()) {
                Ok(()) => report.delivered += 1,
                Err(DeliveryError::Full) => {
                    report.dropped += 1;
                    tracing::warn!(
                        connection_id = %connection.id(),
                        event_type = %envelope.event_type,
                        dropped_total = connection.dropped_frames(),
                        "Notification dropped for slow connection"
                    );
                }
                Err(DeliveryError::Closed) => {
                    self.registry.unregister(&connection.id());
                    report.pruned += 1;
                    tracing::debug!(
                        connection_id = %connection.id(),
                        "Pruned dead notification connection"
                    );
                }
            }
        }

        tracing::debug!(
            event_type = %envelope.event_type,
            delivered = report.delivered,
            dropped = report.dropped,
            pruned = report.pruned,
            "Notification broadcast"
        );

        report
    }
}

impl NotificationBroadcaster for NotificationHub {
    fn notify(&self, kind: NotificationType, payload: Value) {
        self.broadcast(kind, payload);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::notifications::registry::Connection;
    use serde_json::json;

    fn hub() -> NotificationHub {
        NotificationHub::new(Arc::new(ConnectionRegistry::new()))
    }

    fn decode(frame: &Frame) -> Value {
        serde_json::from_str(frame).unwrap()
    }

    #[test]
    fn broadcast_with_no_connections_is_noop() {
        let hub = hub();
        let report = hub.broadcast(NotificationType::Booking, json!({"id": "b1"}));
        assert_eq!(report, BroadcastReport::default());
    }

    #[tokio::test]
    async fn broadcast_reaches_every_connection_once() {
        let hub = hub();
        let mut receivers = Vec::new();
        for _ in 0..3 {
            let (conn, rx) = Connection::open(None, 8);
            hub.registry().register(conn);
            receivers.push(rx);
        }

        let report = hub.broadcast(NotificationType::Booking, json!({"id": "b1"}));
        assert_eq!(report.delivered, 3);

        for rx in receivers.iter_mut() {
            let value = decode(&rx.recv().await.unwrap());
            assert_eq!(value["type"], "booking");
            assert_eq!(value["data"]["id"], "b1");
            assert!(value["timestamp"].as_i64().unwrap() > 0);
            assert!(rx.try_recv().is_err());
        }
    }

    #[tokio::test]
    async fn broadcasts_arrive_in_call_order() {
        let hub = hub();
        let (conn, mut rx) = Connection::open(None, 8);
        hub.registry().register(conn);

        hub.broadcast(NotificationType::Booking, json!({"n": 1}));
        hub.broadcast(NotificationType::Review, json!({"n": 2}));
        hub.broadcast(NotificationType::Booking, json!({"n": 3}));

        for expected in 1..=3 {
            let value = decode(&rx.recv().await.unwrap());
            assert_eq!(value["data"]["n"], expected);
        }
    }

    #[tokio::test]
    async fn dead_connection_is_pruned_and_others_still_receive() {
        let hub = hub();
        let (alive_a, mut rx_a) = Connection::open(None, 8);
        let (dead, rx_dead) = Connection::open(None, 8);
        let (alive_b, mut rx_b) = Connection::open(None, 8);
        hub.registry().register(alive_a);
        hub.registry().register(dead.clone());
        hub.registry().register(alive_b);
        drop(rx_dead);

        let report = hub.broadcast(NotificationType::Review, json!({"rating": 5}));

        assert_eq!(report.delivered, 2);
        assert_eq!(report.pruned, 1);
        assert!(!hub.registry().contains(&dead.id()));
        assert_eq!(hub.registry().len(), 2);
        assert!(rx_a.recv().await.is_some());
        assert!(rx_b.recv().await.is_some());
    }

    #[tokio::test]
    async fn slow_connection_drops_but_stays_registered() {
        let hub = hub();
        let (slow, mut rx) = Connection::open(None, 1);
        hub.registry().register(slow.clone());

        hub.broadcast(NotificationType::Booking, json!({"n": 1}));
        let report = hub.broadcast(NotificationType::Booking, json!({"n": 2}));

        assert_eq!(report.dropped, 1);
        assert!(hub.registry().contains(&slow.id()));
        assert_eq!(decode(&rx.recv().await.unwrap())["data"]["n"], 1);

        hub.broadcast(NotificationType::Booking, json!({"n": 3}));
        assert_eq!(decode(&rx.recv().await.unwrap())["data"]["n"], 3);
    }

    #[test]
    fn connection_added_after_broadcast_sees_nothing() {
        let hub = hub();
        hub.broadcast(NotificationType::Booking, json!({"early": true}));

        let (late, mut rx) = Connection::open(None, 8);
        hub.registry().register(late);

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn concurrent_broadcasts_keep_identical_order_across_connections() {
        let hub = Arc::new(hub());
        let (a, mut rx_a) = Connection::open(None, 256);
        let (b, mut rx_b) = Connection::open(None, 256);
        hub.registry().register(a);
        hub.registry().register(b);

        let tasks: Vec<_> = (0..4)
            .map(|worker| {
                let hub = hub.clone();
                tokio::task::spawn_blocking(move || {
                    for n in 0..25 {
                        hub.broadcast(NotificationType::Booking, json!({"w": worker, "n": n}));
                    }
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let mut seen_a = Vec::new();
        let mut seen_b = Vec::new();
        while let Ok(frame) = rx_a.try_recv() {
            seen_a.push(decode(&frame)["data"].clone());
        }
        while let Ok(frame) = rx_b.try_recv() {
            seen_b.push(decode(&frame)["data"].clone());
        }

        assert_eq!(seen_a.len(), 100);
        assert_eq!(seen_a, seen_b);
    }

    #[tokio::test]
    async fn concurrent_broadcasts_deliver_non_decreasing_timestamps() {
        let hub = Arc::new(hub());
        let (conn, mut rx) = Connection::open(None, 512);
        hub.registry().register(conn);

        let tasks: Vec<_> = (0..8)
            .map(|worker| {
                let hub = hub.clone();
                tokio::task::spawn_blocking(move || {
                    for n in 0..50 {
                        hub.broadcast(NotificationType::Review, json!({"w": worker, "n": n}));
                    }
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let mut stamps = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            stamps.push(decode(&frame)["timestamp"].as_i64().unwrap());
        }
        assert_eq!(stamps.len(), 400);
        assert!(stamps.windows(2).all(|pair| pair[0] <= pair[1]), "{:?}", stamps);
    }

    #[test]
    fn notify_goes_through_broadcast() {
        let hub = hub();
        let (conn, mut rx) = Connection::open(None, 8);
        hub.registry().register(conn);

        let port: &dyn NotificationBroadcaster = &hub;
        port.notify(NotificationType::Review, json!({"id": "r1"}));

        let value = decode(&rx.try_recv().unwrap());
        assert_eq!(value["type"], "review");
    }
}
