//! Client side of the admin notification stream.
//!
//! Used by admin tooling and tests in place of a browser `EventSource`:
//!
//! ```ignore
//! let config = SubscriberConfig::new("http://localhost:8080/api/admin/notifications/stream")
//!     .with_token(token);
//! let handle = NotificationSubscriber::new(config).spawn(Arc::new(NoopSink));
//! // ...
//! println!("{} unread", handle.feed().lock().unwrap().unread());
//! ```

pub mod backoff;
pub mod decoder;
pub mod feed;
pub mod subscriber;

pub use backoff::ReconnectPolicy;
pub use decoder::FrameDecoder;
pub use feed::{FeedUpdate, NoopSink, NotificationFeed, NotificationItem, NotificationSink};
pub use subscriber::{
    NotificationSubscriber, SubscribeError, SubscriberConfig, SubscriptionHandle, DEFAULT_IDLE_TIMEOUT,
};
