//! Local view of the notification stream.

use std::collections::VecDeque;

use serde_json::Value;

use crate::domain::foundation::Timestamp;
use crate::domain::notifications::{EventEnvelope, NotificationType};

/// One booking or review notification as shown to the admin.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationItem {
    pub kind: NotificationType,
    pub data: Value,
    /// Broadcast instant from the envelope.
    pub sent_at: Timestamp,
    pub received_at: Timestamp,
}

/// What applying an envelope changed.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedUpdate {
    /// The stream handshake arrived; the feed is live.
    Connected,
    /// A notification was prepended.
    Added(NotificationItem),
}

/// Live flag, newest-first notification list and unread count.
#[derive(Debug)]
pub struct NotificationFeed {
    live: bool,
    items: VecDeque<NotificationItem>,
    unread: usize,
    max_recent: usize,
}

impl NotificationFeed {
    /// Creates an empty, offline feed keeping at most `max_recent` items.
    pub fn new(max_recent: usize) -> Self {
        Self {
            live: false,
            items: VecDeque::new(),
            unread: 0,
            max_recent: max_recent.max(1),
        }
    }

    pub fn apply(&mut self, envelope: EventEnvelope) -> FeedUpdate {
        match envelope.event_type {
            NotificationType::Connected => {
                self.live = true;
                FeedUpdate::Connected
            }
            kind => {
                let item = NotificationItem {
                    kind,
                    sent_at: envelope.sent_at(),
                    data: envelope.data.unwrap_or(Value::Null),
                    received_at: Timestamp::now(),
                };
                self.items.push_front(item.clone());
                self.items.truncate(self.max_recent);
                self.unread = self.unread.saturating_add(1);
                FeedUpdate::Added(item)
            }
        }
    }

    /// Marks the stream as down. Returns whether it was live.
    pub fn set_offline(&mut self) -> bool {
        std::mem::replace(&mut self.live, false)
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn unread(&self) -> usize {
        self.unread
    }

    pub fn mark_all_read(&mut self) {
        self.unread = 0;
    }

    /// Newest first.
    pub fn items(&self) -> impl Iterator<Item = &NotificationItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for NotificationFeed {
    fn default() -> Self {
        Self::new(50)
    }
}

/// UI side effects for incoming notifications.
pub trait NotificationSink: Send + Sync {
    fn on_connected(&self) {}

    fn on_notification(&self, item: &NotificationItem);

    fn on_disconnected(&self) {}
}

/// Sink that does nothing; the feed alone is enough for some callers.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl NotificationSink for NoopSink {
    fn on_notification(&self, _item: &NotificationItem) {}
}
