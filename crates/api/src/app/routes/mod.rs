use axum::{routing::get, Router};

pub mod products;
pub mod system;

/// Router for the catalog endpoints.
pub fn router() -> Router {
    Router::new().route(
        "/products",
        get(products::list_products).post(products::create_product),
    )
}
