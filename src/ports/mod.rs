//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `SessionValidator` - Admin token validation
//! - `NotificationBroadcaster` - Producer-facing admin notification fan-out
//! - `BookingRepository` / `ReviewRepository` - Record persistence

mod booking_repository;
mod notification_broadcaster;
mod review_repository;
mod session_validator;

pub use booking_repository::BookingRepository;
pub use notification_broadcaster::NotificationBroadcaster;
pub use review_repository::ReviewRepository;
pub use session_validator::SessionValidator;
