//! HTTP adapters - REST API and router assembly.
//!
//! Each domain module has its own HTTP adapter for endpoint exposure.
//! The notification stream itself lives in `adapters::notifications`.

pub mod admin;
pub mod booking;
pub mod error;
pub mod middleware;
pub mod review;
pub mod router;

pub use error::{domain_error_response, ErrorResponse};
pub use router::{build_router, HttpServices};
