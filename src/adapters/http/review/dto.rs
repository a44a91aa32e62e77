//! HTTP DTOs for review endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::review::{NewReview, ReviewSummary};

/// Review form submission.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReviewRequest {
    pub name: String,
    pub tour: String,
    pub rating: u8,
    pub comment: String,
}

impl From<CreateReviewRequest> for NewReview {
    fn from(req: CreateReviewRequest) -> Self {
        NewReview {
            author_name: req.name,
            tour: req.tour,
            rating: req.rating,
            comment: req.comment,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewCreatedResponse {
    pub id: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewListResponse {
    pub items: Vec<ReviewSummary>,
    pub total: usize,
}
