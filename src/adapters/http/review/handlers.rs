//! HTTP handlers for review endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::domain_error_response;
use crate::application::handlers::review::{CreateReviewCommand, CreateReviewHandler};

use super::dto::{CreateReviewRequest, ReviewCreatedResponse};

#[derive(Clone)]
pub struct ReviewHandlers {
    create_handler: Arc<CreateReviewHandler>,
}

impl ReviewHandlers {
    pub fn new(create_handler: Arc<CreateReviewHandler>) -> Self {
        Self { create_handler }
    }
}

/// POST /api/reviews - Submit a review
pub async fn create_review(
    State(handlers): State<ReviewHandlers>,
    Json(req): Json<CreateReviewRequest>,
) -> Response {
    let cmd = CreateReviewCommand { review: req.into() };

    match handlers.create_handler.handle(cmd).await {
        Ok(review) => {
            let response = ReviewCreatedResponse {
                id: review.id().to_string(),
                message: "Thank you for your review".to_string(),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => domain_error_response(e),
    }
}
