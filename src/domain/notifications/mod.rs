//! Notification domain - envelope format and stream lifecycle.

mod envelope;
mod stream_state;

pub use envelope::{EventEnvelope, NotificationType, CONNECTED_MESSAGE};
pub use stream_state::StreamState;
