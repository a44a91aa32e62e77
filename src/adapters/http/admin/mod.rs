//! HTTP adapter for the admin panel API.

mod dto;
mod handlers;
mod routes;

pub use dto::{AdminUserResponse, ListQuery, LoginRequest, LoginResponse};
pub use handlers::{AdminHandlers, SessionCookie};
pub use routes::{admin_routes, admin_session_routes};
