//! Server-sent event stream for admin notifications.
//!
//! Handles a subscription request and manages the connection lifecycle:
//! 1. Authenticate (Bearer header or session cookie), unless bypassed
//! 2. Enqueue the `connected` envelope
//! 3. Register the connection for fan-out
//! 4. Forward frames until the client goes away or the server shuts down
//! 5. Unregister when the response stream is dropped
//!
//! Route: `GET /api/admin/notifications/stream`

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderName, HeaderValue},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    Json,
};
use futures::{stream, Stream, StreamExt};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::adapters::http::middleware::{auth_error_response, AuthGate, RequireAuth};
use crate::config::NotificationsConfig;
use crate::domain::foundation::{StateMachine, Timestamp};
use crate::domain::notifications::{EventEnvelope, StreamState};

use super::broadcaster::NotificationHub;
use super::registry::{Connection, ConnectionRegistry, Frame};

/// Per-stream tuning.
#[derive(Debug, Clone, Copy)]
pub struct StreamSettings {
    pub channel_capacity: usize,
    pub keep_alive: Duration,
}

impl From<&NotificationsConfig> for StreamSettings {
    fn from(config: &NotificationsConfig) -> Self {
        Self {
            channel_capacity: config.channel_capacity,
            keep_alive: config.keep_alive(),
        }
    }
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self::from(&NotificationsConfig::default())
    }
}

/// State required for the notification stream routes.
#[derive(Clone)]
pub struct NotificationStreamState {
    pub hub: Arc<NotificationHub>,
    pub gate: Arc<AuthGate>,
    pub settings: StreamSettings,
    /// Cancelled on server shutdown; ends every open stream.
    pub shutdown: CancellationToken,
}

impl NotificationStreamState {
    pub fn new(hub: Arc<NotificationHub>, gate: Arc<AuthGate>, settings: StreamSettings, shutdown: CancellationToken) -> Self {
        Self {
            hub,
            gate,
            settings,
            shutdown,
        }
    }
}

/// Opens an admin notification stream.
pub async fn notification_stream(State(state): State<NotificationStreamState>, headers: HeaderMap) -> Response {
    let mut lifecycle = StreamState::Unauthenticated;

    let principal = if state.gate.bypass_active() {
        None
    } else {
        lifecycle = advance(lifecycle, StreamState::Authenticating);
        match state.gate.authenticate(&headers).await {
            Ok(user) => Some(user.id),
            Err(e) => {
                advance(lifecycle, StreamState::Closed);
                tracing::info!(error = %e, "Notification stream rejected");
                return auth_error_response(&e);
            }
        }
    };

    lifecycle = advance(lifecycle, StreamState::Open);

    let (connection, rx) = Connection::open(principal, state.settings.channel_capacity);

    // Enqueued before registration so no broadcast can overtake it.
    match EventEnvelope::connected(Timestamp::now()).to_json() {
        Ok(json) => {
            if let Err(e) = connection.deliver(Frame::from(json)) {
                tracing::warn!(connection_id = %connection.id(), error = %e, "Failed to enqueue welcome frame");
            }
        }
        Err(e) => tracing::error!(error = %e, "Failed to serialize welcome envelope"),
    }

    let registry = state.hub.registry().clone();
    registry.register(connection.clone());
    tracing::info!(
        connection_id = %connection.id(),
        principal = connection.principal().map(|p| p.as_str()).unwrap_or("bypass"),
        "Notification stream opened"
    );

    let guard = ConnectionGuard::new(registry, connection, lifecycle);
    let events = frame_stream(rx, guard, state.shutdown.clone());

    (
        [
            (header::CACHE_CONTROL, HeaderValue::from_static("no-cache, no-transform")),
            (HeaderName::from_static("x-accel-buffering"), HeaderValue::from_static("no")),
            (header::CONNECTION, HeaderValue::from_static("keep-alive")),
        ],
        Sse::new(events).keep_alive(KeepAlive::new().interval(state.settings.keep_alive).text("keep-alive")),
    )
        .into_response()
}

fn advance(from: StreamState, to: StreamState) -> StreamState {
    from.transition_to(to).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Unexpected notification stream transition");
        to
    })
}

/// Turns a connection's receiver into SSE events.
///
/// The guard travels with the stream state, so dropping the response body
/// (client disconnect) closes and unregisters the connection.
fn frame_stream(
    rx: mpsc::Receiver<Frame>,
    guard: ConnectionGuard,
    shutdown: CancellationToken,
) -> impl Stream<Item = Result<Event, Infallible>> + Send + 'static {
    stream::unfold((rx, guard), |(mut rx, guard)| async move {
        let frame = rx.recv().await?;
        Some((Ok(Event::default().data(&*frame)), (rx, guard)))
    })
    .take_until(shutdown.cancelled_owned())
}

/// Owns the `Open` end of the stream lifecycle and unregisters the
/// connection when its response stream goes away.
struct ConnectionGuard {
    registry: Arc<ConnectionRegistry>,
    connection: Arc<Connection>,
    lifecycle: StreamState,
}

impl ConnectionGuard {
    fn new(registry: Arc<ConnectionRegistry>, connection: Arc<Connection>, lifecycle: StreamState) -> Self {
        Self {
            registry,
            connection,
            lifecycle,
        }
    }

    /// Moves the stream to `Closed`. Returns false if it already was.
    fn close(&mut self) -> bool {
        if self.lifecycle.is_terminal() {
            return false;
        }
        self.lifecycle = advance(self.lifecycle, StreamState::Closed);
        self.connection.close();
        self.registry.unregister(&self.connection.id());
        tracing::info!(
            connection_id = %self.connection.id(),
            dropped_frames = self.connection.dropped_frames(),
            "Notification stream closed"
        );
        true
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.close();
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamStatus {
    pub connections: usize,
    pub keep_alive_secs: u64,
}

/// Reports the number of live notification streams.
///
/// Route: `GET /api/admin/notifications/status`
pub async fn notification_status(
    State(state): State<NotificationStreamState>,
    RequireAuth(_user): RequireAuth,
) -> Json<StreamStatus> {
    Json(StreamStatus {
        connections: state.hub.registry().len(),
        keep_alive_secs: state.settings.keep_alive.as_secs(),
    })
}
