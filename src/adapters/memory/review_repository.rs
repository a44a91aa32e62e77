//! In-memory review repository.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ReviewId};
use crate::domain::review::Review;
use crate::ports::ReviewRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryReviewRepository {
    reviews: Arc<RwLock<Vec<Review>>>,
}

impl InMemoryReviewRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.reviews.read().await.len()
    }
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn save(&self, review: &Review) -> Result<(), DomainError> {
        let mut reviews = self.reviews.write().await;
        match reviews.iter_mut().find(|r| r.id() == review.id()) {
            Some(existing) => *existing = review.clone(),
            None => reviews.push(review.clone()),
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, DomainError> {
        Ok(self.reviews.read().await.iter().find(|r| r.id() == id).cloned())
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Review>, DomainError> {
        Ok(self.reviews.read().await.iter().rev().take(limit).cloned().collect())
    }
}
