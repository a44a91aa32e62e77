//! Admin notification pipeline adapters.
//!
//! Pushes booking and review events to every connected admin over
//! server-sent events.
//!
//! # Architecture
//!
//! ```text
//! Producers ──► NotificationHub ──► ConnectionRegistry ──► per-connection mpsc
//!                                                                │
//!                                  GET /api/admin/notifications/stream (SSE)
//! ```

pub mod broadcaster;
pub mod registry;
pub mod stream;

pub use broadcaster::{BroadcastReport, NotificationHub};
pub use registry::{Connection, ConnectionRegistry, DeliveryError, Frame};
pub use stream::{
    notification_status, notification_stream, NotificationStreamState, StreamSettings, StreamStatus,
};
