use serde::Serialize;

use tair_products::{Product, ProductId};

pub const PRODUCT_ADDED: &str = "Product added successfully";

/// `POST /products` success body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedProduct {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub message: &'static str,
}

impl From<Product> for CreatedProduct {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            message: PRODUCT_ADDED,
        }
    }
}

/// `GET /health` body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}
