//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers persist first and notify connected admins afterwards.

pub mod handlers;

pub use handlers::{
    CreateBookingCommand, CreateBookingHandler, CreateReviewCommand, CreateReviewHandler,
    ListBookingsHandler, ListBookingsQuery, ListReviewsHandler, ListReviewsQuery,
};
