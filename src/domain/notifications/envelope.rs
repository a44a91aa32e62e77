//! Event envelope broadcast to admin notification subscribers.
//!
//! The serialized form is the JSON carried in each `data:` frame of the
//! notification stream:
//!
//! ```text
//! {"type":"booking","data":{"name":"Jane Doe",...},"timestamp":1718000000000}
//! {"type":"connected","message":"Connected to notifications","timestamp":1718000000000}
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, ValidationError};

/// Message sent as the first frame of every freshly opened stream.
pub const CONNECTED_MESSAGE: &str = "Connected to notifications";

/// Category of a notification envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    /// A customer created a booking.
    Booking,
    /// A customer submitted a review.
    Review,
    /// Stream handshake completed.
    Connected,
}

impl NotificationType {
    /// Wire name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Booking => "booking",
            NotificationType::Review => "review",
            NotificationType::Connected => "connected",
        }
    }

    /// True for categories produced by domain events (as opposed to stream
    /// control messages).
    pub fn is_domain_event(&self) -> bool {
        matches!(self, NotificationType::Booking | NotificationType::Review)
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "booking" => Ok(NotificationType::Booking),
            "review" => Ok(NotificationType::Review),
            "connected" => Ok(NotificationType::Connected),
            other => Err(ValidationError::invalid_format(
                "type",
                format!("unknown notification type '{}'", other),
            )),
        }
    }
}

/// The message pushed to every subscriber.
///
/// `timestamp` is the broadcast instant in Unix milliseconds, not the time of
/// the underlying domain event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    #[serde(rename = "type")]
    pub event_type: NotificationType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    pub timestamp: i64,
}

impl EventEnvelope {
    /// Creates an envelope carrying a payload, stamped at `sent_at`.
    pub fn new(event_type: NotificationType, data: serde_json::Value, sent_at: Timestamp) -> Self {
        Self {
            event_type,
            data: Some(data),
            message: None,
            timestamp: sent_at.as_unix_millis(),
        }
    }

    /// Creates the welcome envelope for a newly opened stream.
    pub fn connected(sent_at: Timestamp) -> Self {
        Self {
            event_type: NotificationType::Connected,
            data: None,
            message: Some(CONNECTED_MESSAGE.to_string()),
            timestamp: sent_at.as_unix_millis(),
        }
    }

    /// Broadcast instant.
    pub fn sent_at(&self) -> Timestamp {
        Timestamp::from_unix_millis(self.timestamp)
    }

    /// Serializes to the compact JSON form used on the wire.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
