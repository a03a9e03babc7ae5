//! Storefront front-end: renders the catalog as HTML and proxies new products to the API.

pub mod app;
pub mod client;
pub mod config;
pub mod middleware;
pub mod render;

/// The storefront always listens here.
pub const LISTEN_ADDR: &str = "0.0.0.0:8080";
