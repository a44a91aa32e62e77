//! Travel Desk - booking and review backend with live admin notifications.
//!
//! New bookings and reviews are fanned out to every connected admin session
//! over server-sent events. The [`client`] module is the consuming side.

pub mod adapters;
pub mod application;
pub mod client;
pub mod config;
pub mod domain;
pub mod ports;
pub mod server;
