//! Adapters - Implementations of ports for external systems.
//!
//! - `auth` - Admin session tokens and login credentials
//! - `http` - REST routes, middleware and router assembly
//! - `memory` - In-memory repositories
//! - `notifications` - Connection registry, broadcaster and SSE stream

pub mod auth;
pub mod http;
pub mod memory;
pub mod notifications;
