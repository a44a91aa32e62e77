//! HTTP routes for review endpoints.

use axum::{routing::post, Router};

use super::handlers::{create_review, ReviewHandlers};

/// Public review routes.
pub fn review_routes(handlers: ReviewHandlers) -> Router {
    Router::new()
        .route("/api/reviews", post(create_review))
        .with_state(handlers)
}
