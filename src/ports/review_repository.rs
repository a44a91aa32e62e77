//! Review repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ReviewId};
use crate::domain::review::Review;

/// Repository port for Review persistence.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Save a new review.
    async fn save(&self, review: &Review) -> Result<(), DomainError>;

    /// Find a review by its ID.
    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, DomainError>;

    /// Most recent reviews first, at most `limit`.
    async fn list_recent(&self, limit: usize) -> Result<Vec<Review>, DomainError>;
}
