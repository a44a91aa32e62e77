//! Review aggregate.

use serde::{Deserialize, Serialize};

use crate::domain::booking::non_empty;
use crate::domain::foundation::{ReviewId, StarRating, Timestamp, ValidationError};

/// Longest accepted review text, in characters.
pub const MAX_COMMENT_CHARS: usize = 2_000;

/// Unvalidated input for a new review.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub author_name: String,
    pub tour: String,
    pub rating: u8,
    pub comment: String,
}

/// A customer review awaiting moderation in the admin panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    id: ReviewId,
    author_name: String,
    tour: String,
    rating: StarRating,
    comment: String,
    created_at: Timestamp,
}

impl Review {
    /// Validates the input and creates a review stamped now.
    pub fn create(input: NewReview) -> Result<Self, ValidationError> {
        let author_name = non_empty("name", input.author_name)?;
        let tour = non_empty("tour", input.tour)?;
        let rating = StarRating::new(input.rating)?;
        let comment = non_empty("comment", input.comment)?;
        let length = comment.chars().count();
        if length > MAX_COMMENT_CHARS {
            return Err(ValidationError::out_of_range(
                "comment",
                1,
                MAX_COMMENT_CHARS as i64,
                length as i64,
            ));
        }

        Ok(Self {
            id: ReviewId::new(),
            author_name,
            tour,
            rating,
            comment,
            created_at: Timestamp::now(),
        })
    }

    pub fn id(&self) -> &ReviewId {
        &self.id
    }

    pub fn author_name(&self) -> &str {
        &self.author_name
    }

    pub fn tour(&self) -> &str {
        &self.tour
    }

    pub fn rating(&self) -> StarRating {
        self.rating
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Summary pushed to admin notification subscribers.
    pub fn summary(&self) -> ReviewSummary {
        ReviewSummary {
            id: self.id.to_string(),
            name: self.author_name.clone(),
            tour: self.tour.clone(),
            rating: self.rating.value(),
            comment: self.comment.clone(),
            created_at: self.created_at.as_unix_millis(),
        }
    }
}

/// Review fields shown in the admin notification list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub id: String,
    pub name: String,
    pub tour: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: i64,
}
