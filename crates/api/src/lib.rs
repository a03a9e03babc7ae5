//! Catalog API: server, routing, and request/response mapping.

pub mod app;
pub mod middleware;

/// The API always listens here.
pub const LISTEN_ADDR: &str = "0.0.0.0:5000";
