//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `booking` - Tour booking aggregate
//! - `review` - Customer review aggregate
//! - `notifications` - Admin notification envelope and stream lifecycle

pub mod booking;
pub mod foundation;
pub mod notifications;
pub mod review;
