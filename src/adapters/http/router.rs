//! Router assembly: routes, auth gating and the shared HTTP layers.
//!
//! ```text
//! SetRequestId → Trace → PropagateRequestId → CORS
//!   ├── REST routes (request timeout)
//!   │     ├── public: /health, /api/bookings, /api/reviews, /api/admin/login|logout
//!   │     └── auth_middleware: /api/admin/bookings|reviews|notifications/status
//!   └── /api/admin/notifications/stream (no timeout, authenticates itself)
//! ```

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::adapters::notifications::{notification_status, notification_stream, NotificationStreamState};
use crate::config::ServerConfig;

use super::admin::{admin_routes, admin_session_routes, AdminHandlers};
use super::booking::{booking_routes, BookingHandlers};
use super::middleware::{auth_middleware, AuthState};
use super::review::{review_routes, ReviewHandlers};

/// Everything the HTTP layer needs, already wired to its ports.
#[derive(Clone)]
pub struct HttpServices {
    pub auth: AuthState,
    pub bookings: BookingHandlers,
    pub reviews: ReviewHandlers,
    pub admin: AdminHandlers,
    pub notifications: NotificationStreamState,
}

/// Builds the complete application router.
pub fn build_router(services: HttpServices, server: &ServerConfig) -> Router {
    let protected = admin_routes(services.admin.clone())
        .merge(
            Router::new()
                .route("/api/admin/notifications/status", get(notification_status))
                .with_state(services.notifications.clone()),
        )
        .layer(middleware::from_fn_with_state(services.auth.clone(), auth_middleware));

    let rest = Router::new()
        .route("/health", get(health))
        .merge(booking_routes(services.bookings))
        .merge(review_routes(services.reviews))
        .merge(admin_session_routes(services.admin))
        .merge(protected)
        .layer(TimeoutLayer::new(server.request_timeout()));

    // Long-lived; must not inherit the request timeout.
    let stream = Router::new()
        .route("/api/admin/notifications/stream", get(notification_stream))
        .with_state(services.notifications);

    rest.merge(stream)
        .layer(cors_layer(server))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}
