//! In-memory repository adapters.

mod booking_repository;
mod review_repository;

pub use booking_repository::InMemoryBookingRepository;
pub use review_repository::InMemoryReviewRepository;
