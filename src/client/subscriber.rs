//! Reconnecting subscriber for the admin notification stream.
//!
//! # Lifecycle
//!
//! ```text
//! connect ──► 2xx ──► decode frames ──► feed + sink
//!    ▲          │            │
//!    │       401/403      stream ends / idle / transport error / other status
//!    │          │            │
//!    │        stop        wait backoff(attempt) ──┐
//!    └────────────────────────────────────────────┘
//! ```
//!
//! The attempt counter resets whenever a `connected` envelope arrives, so a
//! healthy stream that drops reconnects after the shortest delay. A stream
//! that goes silent for longer than the idle timeout (the server sends
//! keep-alives well inside it) is treated as dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::StreamExt;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, Secret};
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::domain::notifications::EventEnvelope;

use super::backoff::ReconnectPolicy;
use super::decoder::FrameDecoder;
use super::feed::{FeedUpdate, NotificationFeed, NotificationSink};

/// Why a subscription attempt ended.
#[derive(Debug, Error)]
pub enum SubscribeError {
    /// The server refused the credential; retrying cannot help.
    #[error("notification stream rejected credentials ({0})")]
    Unauthorized(StatusCode),

    #[error("notification stream returned {0}")]
    Status(StatusCode),

    /// Nothing arrived, not even a keep-alive, within the idle timeout.
    #[error("notification stream idle for {0:?}")]
    Idle(Duration),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl SubscribeError {
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self, SubscribeError::Unauthorized(_))
    }
}

/// Where and how to subscribe.
#[derive(Debug)]
pub struct SubscriberConfig {
    /// Full stream URL, e.g. `http://host/api/admin/notifications/stream`.
    pub url: String,
    /// Sent as `Authorization: Bearer`; omit under the development bypass.
    pub token: Option<Secret<String>>,
    pub policy: ReconnectPolicy,
    /// Size of the local notification list.
    pub max_recent: usize,
    /// Longest silence tolerated before the connection is abandoned.
    pub idle_timeout: Duration,
}

/// Three server keep-alive periods.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(45);

impl SubscriberConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: None,
            policy: ReconnectPolicy::default(),
            max_recent: 50,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(Secret::new(token.into()));
        self
    }

    pub fn with_policy(mut self, policy: ReconnectPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_max_recent(mut self, max_recent: usize) -> Self {
        self.max_recent = max_recent;
        self
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }
}

/// Consumes the notification stream into a [`NotificationFeed`].
pub struct NotificationSubscriber {
    client: reqwest::Client,
    config: SubscriberConfig,
    feed: Arc<Mutex<NotificationFeed>>,
}

impl NotificationSubscriber {
    pub fn new(config: SubscriberConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: SubscriberConfig) -> Self {
        let feed = Arc::new(Mutex::new(NotificationFeed::new(config.max_recent)));
        Self { client, config, feed }
    }

    /// Shared handle to the local view.
    pub fn feed(&self) -> Arc<Mutex<NotificationFeed>> {
        self.feed.clone()
    }

    /// Subscribes until `cancel` fires or the server rejects the credential.
    ///
    /// Returns `Ok(())` on cancellation and `Err(Unauthorized)` on auth
    /// rejection. Every other failure is retried.
    pub async fn run(&self, sink: Arc<dyn NotificationSink>, cancel: CancellationToken) -> Result<(), SubscribeError> {
        let mut attempt: u32 = 0;

        loop {
            let outcome = tokio::select! {
                _ = cancel.cancelled() => {
                    self.go_offline(sink.as_ref());
                    return Ok(());
                }
                outcome = self.session(sink.as_ref(), &mut attempt) => outcome,
            };
            self.go_offline(sink.as_ref());

            match outcome {
                Err(e) if e.is_auth_rejection() => {
                    tracing::warn!(url = %self.config.url, error = %e, "Notification subscription stopped");
                    return Err(e);
                }
                Err(e) => tracing::debug!(error = %e, attempt, "Notification stream interrupted"),
                Ok(()) => tracing::debug!(attempt, "Notification stream ended"),
            }

            let delay = self.config.policy.delay(attempt);
            attempt = attempt.saturating_add(1);

            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    /// Runs the subscriber on a background task.
    pub fn spawn(self, sink: Arc<dyn NotificationSink>) -> SubscriptionHandle {
        let cancel = CancellationToken::new();
        let feed = self.feed();
        let token = cancel.clone();
        let task = tokio::spawn(async move { self.run(sink, token).await });

        SubscriptionHandle { cancel, feed, task }
    }

    /// One connection: open, decode until the body ends.
    async fn session(&self, sink: &dyn NotificationSink, attempt: &mut u32) -> Result<(), SubscribeError> {
        let mut request = self.client.get(&self.config.url).header(ACCEPT, "text/event-stream");
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SubscribeError::Unauthorized(status));
        }
        if !status.is_success() {
            return Err(SubscribeError::Status(status));
        }

        let mut decoder = FrameDecoder::new();
        let mut body = response.bytes_stream();
        loop {
            let chunk = match tokio::time::timeout(self.config.idle_timeout, body.next()).await {
                Ok(Some(chunk)) => chunk?,
                Ok(None) => break,
                Err(_) => return Err(SubscribeError::Idle(self.config.idle_timeout)),
            };
            for envelope in decoder.push(&chunk) {
                if self.dispatch(envelope, sink) {
                    *attempt = 0;
                }
            }
        }

        let discarded = decoder.finish();
        if discarded > 0 {
            tracing::debug!(bytes = discarded, "Discarded incomplete trailing frame");
        }
        Ok(())
    }

    /// Applies an envelope; returns true for the stream handshake.
    fn dispatch(&self, envelope: EventEnvelope, sink: &dyn NotificationSink) -> bool {
        let update = self.lock_feed().apply(envelope);
        match update {
            FeedUpdate::Connected => {
                tracing::debug!(url = %self.config.url, "Notification stream live");
                sink.on_connected();
                true
            }
            FeedUpdate::Added(item) => {
                sink.on_notification(&item);
                false
            }
        }
    }

    fn go_offline(&self, sink: &dyn NotificationSink) {
        if self.lock_feed().set_offline() {
            sink.on_disconnected();
        }
    }

    fn lock_feed(&self) -> MutexGuard<'_, NotificationFeed> {
        self.feed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle to a background subscription.
pub struct SubscriptionHandle {
    cancel: CancellationToken,
    feed: Arc<Mutex<NotificationFeed>>,
    task: JoinHandle<Result<(), SubscribeError>>,
}

impl SubscriptionHandle {
    pub fn feed(&self) -> Arc<Mutex<NotificationFeed>> {
        self.feed.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancels the subscription and waits for it to wind down.
    pub async fn stop(self) -> Result<(), SubscribeError> {
        self.cancel.cancel();
        self.join().await
    }

    /// Waits for the subscription to end on its own.
    pub async fn join(self) -> Result<(), SubscribeError> {
        match self.task.await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(error = %e, "Notification subscriber task failed");
                Ok(())
            }
        }
    }
}
