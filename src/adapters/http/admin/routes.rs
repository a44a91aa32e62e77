//! HTTP routes for admin endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{list_bookings, list_reviews, login, logout, AdminHandlers};

/// Login and logout; reachable without a session.
pub fn admin_session_routes(handlers: AdminHandlers) -> Router {
    Router::new()
        .route("/api/admin/login", post(login))
        .route("/api/admin/logout", post(logout))
        .with_state(handlers)
}

/// Admin data routes; mount behind `auth_middleware`.
pub fn admin_routes(handlers: AdminHandlers) -> Router {
    Router::new()
        .route("/api/admin/bookings", get(list_bookings))
        .route("/api/admin/reviews", get(list_reviews))
        .with_state(handlers)
}
