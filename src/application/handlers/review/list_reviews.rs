//! ListReviewsHandler - Query handler for the admin review list.

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::domain::review::ReviewSummary;
use crate::ports::ReviewRepository;

pub const MAX_REVIEWS_PAGE: usize = 200;

#[derive(Debug, Clone, Copy)]
pub struct ListReviewsQuery {
    pub limit: usize,
}

pub struct ListReviewsHandler {
    repository: Arc<dyn ReviewRepository>,
}

impl ListReviewsHandler {
    pub fn new(repository: Arc<dyn ReviewRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: ListReviewsQuery) -> Result<Vec<ReviewSummary>, DomainError> {
        let limit = query.limit.clamp(1, MAX_REVIEWS_PAGE);
        let reviews = self.repository.list_recent(limit).await?;
        Ok(reviews.iter().map(|r| r.summary()).collect())
    }
}
