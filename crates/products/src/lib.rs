//! Products domain module.
//!
//! Plain product types plus the create-request schema and its validation
//! (no IO, no HTTP, no storage).

pub mod product;
pub mod request;

pub use product::{NewProduct, Product, ProductId};
pub use request::{CreateProductRequest, PriceInput, ValidationError};
