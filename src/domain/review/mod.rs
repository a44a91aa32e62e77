//! Review domain.

mod aggregate;

pub use aggregate::{NewReview, Review, ReviewSummary, MAX_COMMENT_CHARS};
