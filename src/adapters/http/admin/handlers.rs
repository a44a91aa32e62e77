//! HTTP handlers for the admin panel API.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::auth::{AdminCredentials, JwtSessionValidator};
use crate::adapters::http::booking::BookingListResponse;
use crate::adapters::http::error::{domain_error_response, ErrorResponse};
use crate::adapters::http::middleware::{auth_error_response, RequireAuth};
use crate::adapters::http::review::ReviewListResponse;
use crate::application::handlers::{ListBookingsHandler, ListBookingsQuery, ListReviewsHandler, ListReviewsQuery};

use super::dto::{AdminUserResponse, ListQuery, LoginRequest, LoginResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

/// Settings for the session cookie written at login.
#[derive(Debug, Clone)]
pub struct SessionCookie {
    pub name: String,
    /// Adds the `Secure` attribute (HTTPS deployments).
    pub secure: bool,
}

impl SessionCookie {
    fn issue(&self, token: &str, max_age_secs: u64) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Strict; Max-Age={}{}",
            self.name,
            token,
            max_age_secs,
            if self.secure { "; Secure" } else { "" }
        )
    }

    fn clear(&self) -> String {
        self.issue("", 0)
    }
}

#[derive(Clone)]
pub struct AdminHandlers {
    credentials: Arc<AdminCredentials>,
    tokens: Arc<JwtSessionValidator>,
    cookie: SessionCookie,
    list_bookings: Arc<ListBookingsHandler>,
    list_reviews: Arc<ListReviewsHandler>,
}

impl AdminHandlers {
    pub fn new(
        credentials: Arc<AdminCredentials>,
        tokens: Arc<JwtSessionValidator>,
        cookie: SessionCookie,
        list_bookings: Arc<ListBookingsHandler>,
        list_reviews: Arc<ListReviewsHandler>,
    ) -> Self {
        Self {
            credentials,
            tokens,
            cookie,
            list_bookings,
            list_reviews,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/admin/login - Exchange admin credentials for a session token
pub async fn login(State(handlers): State<AdminHandlers>, Json(req): Json<LoginRequest>) -> Response {
    let user = match handlers.credentials.verify(&req.username, &req.password) {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(username = %req.username, "Admin login failed");
            return auth_error_response(&e);
        }
    };

    let issued = match handlers.tokens.issue(&user) {
        Ok(issued) => issued,
        Err(e) => return auth_error_response(&e),
    };

    let cookie = handlers.cookie.issue(&issued.token, handlers.tokens.token_ttl().as_secs());
    let cookie = match HeaderValue::from_str(&cookie) {
        Ok(value) => value,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("Failed to build session cookie")),
            )
                .into_response()
        }
    };

    tracing::info!(user_id = %user.id, "Admin logged in");

    let body = LoginResponse {
        token: issued.token,
        expires_at: issued.expires_at.as_unix_millis(),
        user: AdminUserResponse {
            id: user.id.to_string(),
            display_name: user.display_name_or_id().to_string(),
        },
    };
    (StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(body)).into_response()
}

/// POST /api/admin/logout - Clear the session cookie
pub async fn logout(State(handlers): State<AdminHandlers>) -> Response {
    match HeaderValue::from_str(&handlers.cookie.clear()) {
        Ok(cookie) => (StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]).into_response(),
        Err(_) => StatusCode::NO_CONTENT.into_response(),
    }
}

/// GET /api/admin/bookings - Recent bookings, newest first
pub async fn list_bookings(
    State(handlers): State<AdminHandlers>,
    RequireAuth(_user): RequireAuth,
    Query(query): Query<ListQuery>,
) -> Response {
    match handlers.list_bookings.handle(ListBookingsQuery { limit: query.limit }).await {
        Ok(items) => {
            let total = items.len();
            (StatusCode::OK, Json(BookingListResponse { items, total })).into_response()
        }
        Err(e) => domain_error_response(e),
    }
}

/// GET /api/admin/reviews - Recent reviews, newest first
pub async fn list_reviews(
    State(handlers): State<AdminHandlers>,
    RequireAuth(_user): RequireAuth,
    Query(query): Query<ListQuery>,
) -> Response {
    match handlers.list_reviews.handle(ListReviewsQuery { limit: query.limit }).await {
        Ok(items) => {
            let total = items.len();
            (StatusCode::OK, Json(ReviewListResponse { items, total })).into_response()
        }
        Err(e) => domain_error_response(e),
    }
}
