//! End-to-end tests for the admin notification stream.
//!
//! Each test starts a real server on an ephemeral port and talks to it over
//! HTTP, so auth, routing, the hub and the SSE framing are all exercised
//! together.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::BoxStream;
use futures::StreamExt;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use travel_desk::client::{FrameDecoder, NoopSink, NotificationSubscriber, ReconnectPolicy, SubscriberConfig};
use travel_desk::config::{AppConfig, AuthConfig, NotificationsConfig};
use travel_desk::domain::foundation::{AuthenticatedUser, UserId};
use travel_desk::domain::notifications::{EventEnvelope, NotificationType, CONNECTED_MESSAGE};
use travel_desk::server::{self, App, ServerHandle};

// =============================================================================
// Test Infrastructure
// =============================================================================

const ADMIN_PASSWORD: &str = "integration-password";
const WAIT: Duration = Duration::from_secs(5);

fn test_config() -> AppConfig {
    AppConfig {
        auth: AuthConfig {
            jwt_secret: "integration-secret-integration-secret".to_string(),
            admin_password: ADMIN_PASSWORD.to_string(),
            ..Default::default()
        },
        notifications: NotificationsConfig {
            keep_alive_secs: 1,
            ..Default::default()
        },
        ..Default::default()
    }
}

async fn start_server() -> ServerHandle {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    server::start_with_listener(App::from_config(test_config()), listener)
        .await
        .unwrap()
}

fn admin_token(handle: &ServerHandle) -> String {
    let user = AuthenticatedUser::new(UserId::new("admin").unwrap(), Some("Administrator".into()));
    handle.tokens().issue(&user).unwrap().token
}

fn stream_url(handle: &ServerHandle) -> String {
    format!("{}/api/admin/notifications/stream", handle.base_url())
}

fn jane_doe_booking() -> Value {
    json!({
        "name": "Jane Doe",
        "email": "jane@example.com",
        "tour": "Amalfi Coast Explorer",
        "travellers": 2,
        "totalPrice": 450.0,
        "currencySymbol": "$"
    })
}

async fn post_json(handle: &ServerHandle, path: &str, body: Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{}{}", handle.base_url(), path))
        .json(&body)
        .send()
        .await
        .unwrap()
}

/// Polls until the registry holds `expected` connections.
async fn wait_for_connections(handle: &ServerHandle, expected: usize) {
    let registry = handle.hub().registry().clone();
    tokio::time::timeout(WAIT, async move {
        while registry.len() != expected {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("registry never reached {} connections", expected));
}

/// An open stream read envelope by envelope.
struct StreamReader {
    body: BoxStream<'static, reqwest::Result<Vec<u8>>>,
    decoder: FrameDecoder,
    pending: VecDeque<EventEnvelope>,
}

impl StreamReader {
    async fn open(url: &str, token: Option<&str>) -> Result<Self, reqwest::StatusCode> {
        let mut request = reqwest::Client::new().get(url).header("accept", "text/event-stream");
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.unwrap();
        if !response.status().is_success() {
            return Err(response.status());
        }
        Ok(Self::from_response(response))
    }

    fn from_response(response: reqwest::Response) -> Self {
        Self {
            body: response.bytes_stream().map(|chunk| chunk.map(|b| b.to_vec())).boxed(),
            decoder: FrameDecoder::new(),
            pending: VecDeque::new(),
        }
    }

    /// Next envelope, or `None` when the server ends the stream.
    async fn next(&mut self) -> Option<EventEnvelope> {
        tokio::time::timeout(WAIT, async {
            loop {
                if let Some(envelope) = self.pending.pop_front() {
                    return Some(envelope);
                }
                match self.body.next().await {
                    Some(Ok(chunk)) => self.pending.extend(self.decoder.push(&chunk)),
                    Some(Err(_)) | None => return None,
                }
            }
        })
        .await
        .expect("timed out waiting for a notification frame")
    }

    async fn expect_connected(&mut self) {
        let first = self.next().await.expect("stream closed before handshake");
        assert_eq!(first.event_type, NotificationType::Connected);
        assert_eq!(first.message.as_deref(), Some(CONNECTED_MESSAGE));
    }
}

// =============================================================================
// Handshake and authentication
// =============================================================================

#[tokio::test]
async fn authenticated_client_receives_connected_first() {
    let handle = start_server().await;
    let token = admin_token(&handle);

    let response = reqwest::Client::new()
        .get(stream_url(&handle))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/event-stream"));
    assert!(response.headers()["cache-control"].to_str().unwrap().contains("no-cache"));

    let mut reader = StreamReader::from_response(response);
    reader.expect_connected().await;
    wait_for_connections(&handle, 1).await;

    drop(reader);
    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn invalid_credentials_are_rejected_without_registration() {
    let handle = start_server().await;
    let mut existing = StreamReader::open(&stream_url(&handle), Some(&admin_token(&handle)))
        .await
        .unwrap();
    existing.expect_connected().await;
    wait_for_connections(&handle, 1).await;

    let status = StreamReader::open(&stream_url(&handle), Some("not-a-jwt")).await.err();
    assert_eq!(status, Some(reqwest::StatusCode::UNAUTHORIZED));

    let status = StreamReader::open(&stream_url(&handle), None).await.err();
    assert_eq!(status, Some(reqwest::StatusCode::UNAUTHORIZED));

    assert_eq!(handle.hub().registry().len(), 1);

    drop(existing);
    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn login_cookie_authenticates_the_stream() {
    let handle = start_server().await;
    let client = reqwest::Client::new();

    let wrong = client
        .post(format!("{}/api/admin/login", handle.base_url()))
        .json(&json!({ "username": "admin", "password": "nope" }))
        .send()
        .await
        .unwrap();
    assert_eq!(wrong.status(), reqwest::StatusCode::UNAUTHORIZED);

    let login = client
        .post(format!("{}/api/admin/login", handle.base_url()))
        .json(&json!({ "username": "admin", "password": ADMIN_PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(login.status(), reqwest::StatusCode::OK);

    let cookie = login.headers()["set-cookie"].to_str().unwrap().to_string();
    assert!(cookie.starts_with("admin_token="));
    assert!(cookie.contains("HttpOnly"));
    let pair = cookie.split(';').next().unwrap().to_string();

    let body: Value = login.json().await.unwrap();
    assert!(!body["token"].as_str().unwrap().is_empty());

    let response = client
        .get(stream_url(&handle))
        .header("cookie", pair)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    StreamReader::from_response(response).expect_connected().await;

    handle.shutdown().await.unwrap();
}

// =============================================================================
// Fan-out
// =============================================================================

#[tokio::test]
async fn two_clients_receive_booking_then_review_in_order() {
    let handle = start_server().await;
    let token = admin_token(&handle);

    let mut first = StreamReader::open(&stream_url(&handle), Some(&token)).await.unwrap();
    let mut second = StreamReader::open(&stream_url(&handle), Some(&token)).await.unwrap();
    first.expect_connected().await;
    second.expect_connected().await;
    wait_for_connections(&handle, 2).await;

    let created = post_json(&handle, "/api/bookings", jane_doe_booking()).await;
    assert_eq!(created.status(), reqwest::StatusCode::CREATED);
    let created = post_json(
        &handle,
        "/api/reviews",
        json!({ "name": "Sam", "tour": "Amalfi Coast Explorer", "rating": 5, "comment": "Superb" }),
    )
    .await;
    assert_eq!(created.status(), reqwest::StatusCode::CREATED);

    for reader in [&mut first, &mut second] {
        let booking = reader.next().await.unwrap();
        assert_eq!(booking.event_type, NotificationType::Booking);
        let data = booking.data.unwrap();
        assert_eq!(data["name"], "Jane Doe");
        assert_eq!(data["tour"], "Amalfi Coast Explorer");
        assert_eq!(data["travellers"], 2);
        assert_eq!(data["totalPrice"], 450.0);
        assert_eq!(data["currencySymbol"], "$");

        let review = reader.next().await.unwrap();
        assert_eq!(review.event_type, NotificationType::Review);
        assert_eq!(review.data.unwrap()["rating"], 5);
        assert!(review.timestamp >= booking.timestamp);
    }

    drop((first, second));
    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn invalid_booking_is_rejected_and_not_broadcast() {
    let handle = start_server().await;
    let mut reader = StreamReader::open(&stream_url(&handle), Some(&admin_token(&handle)))
        .await
        .unwrap();
    reader.expect_connected().await;

    let mut bad = jane_doe_booking();
    bad["travellers"] = json!(0);
    let response = post_json(&handle, "/api/bookings", bad).await;
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    post_json(&handle, "/api/bookings", jane_doe_booking()).await;
    let next = reader.next().await.unwrap();
    assert_eq!(next.data.unwrap()["travellers"], 2);

    drop(reader);
    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn closed_client_is_pruned_while_others_keep_receiving() {
    let handle = start_server().await;
    let token = admin_token(&handle);

    let mut stays = StreamReader::open(&stream_url(&handle), Some(&token)).await.unwrap();
    let mut leaves = StreamReader::open(&stream_url(&handle), Some(&token)).await.unwrap();
    stays.expect_connected().await;
    leaves.expect_connected().await;
    wait_for_connections(&handle, 2).await;

    drop(leaves);
    wait_for_connections(&handle, 1).await;

    let report = handle.hub().broadcast(NotificationType::Booking, json!({ "name": "Jane Doe" }));
    assert_eq!(report.delivered, 1);

    let received = stays.next().await.unwrap();
    assert_eq!(received.data.unwrap()["name"], "Jane Doe");

    drop(stays);
    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn reconnecting_client_gets_no_replay() {
    let handle = start_server().await;
    let token = admin_token(&handle);

    let mut reader = StreamReader::open(&stream_url(&handle), Some(&token)).await.unwrap();
    reader.expect_connected().await;
    wait_for_connections(&handle, 1).await;
    handle.hub().broadcast(NotificationType::Booking, json!({ "seq": 1 }));
    assert_eq!(reader.next().await.unwrap().data.unwrap()["seq"], 1);

    drop(reader);
    wait_for_connections(&handle, 0).await;
    let missed = handle.hub().broadcast(NotificationType::Booking, json!({ "seq": 2 }));
    assert_eq!(missed.attempted(), 0);

    let mut reader = StreamReader::open(&stream_url(&handle), Some(&token)).await.unwrap();
    reader.expect_connected().await;
    wait_for_connections(&handle, 1).await;
    handle.hub().broadcast(NotificationType::Booking, json!({ "seq": 3 }));
    assert_eq!(reader.next().await.unwrap().data.unwrap()["seq"], 3);

    drop(reader);
    handle.shutdown().await.unwrap();
}

// =============================================================================
// Admin surface and lifecycle
// =============================================================================

#[tokio::test]
async fn status_and_lists_require_auth() {
    let handle = start_server().await;
    let token = admin_token(&handle);
    let client = reqwest::Client::new();

    let status_url = format!("{}/api/admin/notifications/status", handle.base_url());
    let anonymous = client.get(&status_url).send().await.unwrap();
    assert_eq!(anonymous.status(), reqwest::StatusCode::UNAUTHORIZED);

    let mut reader = StreamReader::open(&stream_url(&handle), Some(&token)).await.unwrap();
    reader.expect_connected().await;
    wait_for_connections(&handle, 1).await;

    let status: Value = client
        .get(&status_url)
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["connections"], 1);

    post_json(&handle, "/api/bookings", jane_doe_booking()).await;
    let bookings: Value = client
        .get(format!("{}/api/admin/bookings", handle.base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(bookings["total"], 1);
    assert_eq!(bookings["items"][0]["name"], "Jane Doe");

    drop(reader);
    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn shutdown_ends_open_streams() {
    let handle = start_server().await;
    let mut reader = StreamReader::open(&stream_url(&handle), Some(&admin_token(&handle)))
        .await
        .unwrap();
    reader.expect_connected().await;

    let hub = handle.hub().clone();
    let shutdown = tokio::spawn(handle.shutdown());

    assert!(reader.next().await.is_none());
    drop(reader);
    shutdown.await.unwrap().unwrap();
    assert!(hub.registry().is_empty());
}

// =============================================================================
// Subscriber
// =============================================================================

#[tokio::test]
async fn subscriber_feed_tracks_live_stream() {
    let handle = start_server().await;
    let config = SubscriberConfig::new(stream_url(&handle))
        .with_token(admin_token(&handle))
        .with_policy(ReconnectPolicy {
            first: Duration::from_millis(20),
            max: Duration::from_millis(100),
            factor: 2.0,
        });
    let subscription = NotificationSubscriber::new(config).spawn(Arc::new(NoopSink));
    let feed = subscription.feed();

    wait_for_connections(&handle, 1).await;
    tokio::time::timeout(WAIT, async {
        while !feed.lock().unwrap().is_live() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();

    post_json(&handle, "/api/bookings", jane_doe_booking()).await;
    tokio::time::timeout(WAIT, async {
        while feed.lock().unwrap().is_empty() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();

    {
        let mut feed = feed.lock().unwrap();
        assert_eq!(feed.unread(), 1);
        let item = feed.items().next().unwrap();
        assert_eq!(item.kind, NotificationType::Booking);
        assert_eq!(item.data["name"], "Jane Doe");
        feed.mark_all_read();
        assert_eq!(feed.unread(), 0);
    }

    handle.shutdown().await.unwrap();
    tokio::time::timeout(WAIT, async {
        while feed.lock().unwrap().is_live() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();

    subscription.stop().await.unwrap();
}

#[tokio::test]
async fn subscriber_stops_on_rejected_token() {
    let handle = start_server().await;
    let config = SubscriberConfig::new(stream_url(&handle)).with_token("forged");
    let subscription = NotificationSubscriber::new(config).spawn(Arc::new(NoopSink));

    let result = tokio::time::timeout(WAIT, subscription.join()).await.unwrap();
    assert!(result.unwrap_err().is_auth_rejection());
    assert!(handle.hub().registry().is_empty());

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn subscriber_reconnects_after_server_restart_without_replay() {
    let handle = start_server().await;
    let addr = handle.addr;
    let config = SubscriberConfig::new(stream_url(&handle))
        .with_token(admin_token(&handle))
        .with_idle_timeout(Duration::from_secs(3))
        .with_policy(ReconnectPolicy {
            first: Duration::from_millis(20),
            max: Duration::from_millis(100),
            factor: 2.0,
        });
    let subscription = NotificationSubscriber::new(config).spawn(Arc::new(NoopSink));
    let feed = subscription.feed();

    let wait_live = |live: bool| {
        let feed = feed.clone();
        async move {
            tokio::time::timeout(WAIT, async {
                while feed.lock().unwrap().is_live() != live {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                }
            })
            .await
            .unwrap_or_else(|_| panic!("feed never became live={}", live));
        }
    };

    wait_live(true).await;
    handle.shutdown().await.unwrap();
    wait_live(false).await;

    // Same address and signing secret, so the old token is still accepted.
    let listener = TcpListener::bind(addr).await.unwrap();
    let app = App::from_config(test_config());
    // Emitted while the subscriber is disconnected.
    let missed = app.hub().broadcast(NotificationType::Booking, json!({ "gap": true }));
    assert_eq!(missed.delivered, 0);
    let handle = server::start_with_listener(app, listener).await.unwrap();

    wait_live(true).await;
    wait_for_connections(&handle, 1).await;
    post_json(&handle, "/api/bookings", jane_doe_booking()).await;
    tokio::time::timeout(WAIT, async {
        while feed.lock().unwrap().is_empty() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();

    {
        let feed = feed.lock().unwrap();
        assert_eq!(feed.len(), 1);
        assert!(feed.items().all(|item| item.data.get("gap").is_none()));
        assert_eq!(feed.items().next().unwrap().data["name"], "Jane Doe");
    }

    assert!(!subscription.is_finished());
    subscription.stop().await.unwrap();
    handle.shutdown().await.unwrap();
}
