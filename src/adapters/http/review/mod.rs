//! HTTP adapter for review endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{CreateReviewRequest, ReviewCreatedResponse, ReviewListResponse};
pub use handlers::ReviewHandlers;
pub use routes::review_routes;
