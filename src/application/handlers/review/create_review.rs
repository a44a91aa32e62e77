//! CreateReviewHandler - Command handler for customer reviews.

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::domain::notifications::NotificationType;
use crate::domain::review::{NewReview, Review};
use crate::ports::{NotificationBroadcaster, ReviewRepository};

/// Command to submit a review.
#[derive(Debug, Clone)]
pub struct CreateReviewCommand {
    pub review: NewReview,
}

/// Handler for creating reviews.
pub struct CreateReviewHandler {
    repository: Arc<dyn ReviewRepository>,
    broadcaster: Arc<dyn NotificationBroadcaster>,
}

impl CreateReviewHandler {
    pub fn new(repository: Arc<dyn ReviewRepository>, broadcaster: Arc<dyn NotificationBroadcaster>) -> Self {
        Self {
            repository,
            broadcaster,
        }
    }

    pub async fn handle(&self, cmd: CreateReviewCommand) -> Result<Review, DomainError> {
        let review = Review::create(cmd.review)?;

        self.repository.save(&review).await?;

        match serde_json::to_value(review.summary()) {
            Ok(payload) => self.broadcaster.notify(NotificationType::Review, payload),
            Err(e) => tracing::error!(review_id = %review.id(), error = %e, "Failed to encode review notification"),
        }

        tracing::info!(review_id = %review.id(), rating = %review.rating(), "Review submitted");
        Ok(review)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryReviewRepository;
    use crate::application::handlers::test_support::{FailingReviewRepository, RecordingBroadcaster};
    use crate::domain::foundation::ErrorCode;

    fn five_stars() -> NewReview {
        NewReview {
            author_name: "Max Mustermann".to_string(),
            tour: "Black Forest Hike".to_string(),
            rating: 5,
            comment: "Wunderbar!".to_string(),
        }
    }

    #[tokio::test]
    async fn persists_then_notifies() {
        let repo = Arc::new(InMemoryReviewRepository::new());
        let broadcaster = Arc::new(RecordingBroadcaster::default());
        let handler = CreateReviewHandler::new(repo.clone(), broadcaster.clone());

        let review = handler.handle(CreateReviewCommand { review: five_stars() }).await.unwrap();

        assert!(repo.find_by_id(review.id()).await.unwrap().is_some());
        let sent = broadcaster.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, NotificationType::Review);
        assert_eq!(sent[0].1["rating"], 5);
        assert_eq!(sent[0].1["name"], "Max Mustermann");
    }

    #[tokio::test]
    async fn bad_rating_is_rejected_before_persisting() {
        let repo = Arc::new(InMemoryReviewRepository::new());
        let broadcaster = Arc::new(RecordingBroadcaster::default());
        let handler = CreateReviewHandler::new(repo.clone(), broadcaster.clone());

        let err = handler
            .handle(CreateReviewCommand {
                review: NewReview { rating: 6, ..five_stars() },
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(repo.count().await, 0);
        assert!(broadcaster.sent().is_empty());
    }

    #[tokio::test]
    async fn failed_save_is_not_broadcast() {
        let broadcaster = Arc::new(RecordingBroadcaster::default());
        let handler = CreateReviewHandler::new(Arc::new(FailingReviewRepository), broadcaster.clone());

        assert!(handler.handle(CreateReviewCommand { review: five_stars() }).await.is_err());
        assert!(broadcaster.sent().is_empty());
    }
}
