//! Catalog store boundary.
//!
//! The store is reached through a connect / operate / close protocol: callers
//! open one [`CatalogConnection`] per request, run a single operation on it, and
//! hand it back through [`CatalogConnection::close`] on every exit path.
//!
//! ## Error Mapping
//!
//! | Failure | StoreError |
//! |---------|------------|
//! | Engine unreachable, bad credentials, unknown database | `Connect` |
//! | SELECT / INSERT rejected by the engine | `Query` |
//! | COMMIT rejected (row is rolled back) | `Commit` |
//! | Row present but a column cannot be mapped to a `Product` | `Decode` |
//! | Closing the connection failed | `Close` |

use async_trait::async_trait;
use thiserror::Error;

use tair_products::{NewProduct, Product, ProductId};

pub mod in_memory;
pub mod mysql;

pub use in_memory::InMemoryCatalogStore;
pub use mysql::MySqlCatalogStore;

/// Infrastructure failure while talking to the catalog store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("commit failed: {0}")]
    Commit(String),

    #[error("failed to decode product row: {0}")]
    Decode(String),

    #[error("close failed: {0}")]
    Close(String),
}

/// Factory for fresh, unpooled store connections.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn CatalogConnection>, StoreError>;
}

/// One open connection to the catalog store.
#[async_trait]
pub trait CatalogConnection: Send {
    /// Read every product row in storage order.
    async fn fetch_products(&mut self) -> Result<Vec<Product>, StoreError>;

    /// Insert one row inside its own transaction and commit it.
    ///
    /// Returns the engine-assigned id. On any error nothing is left committed.
    async fn insert_product(&mut self, product: &NewProduct) -> Result<ProductId, StoreError>;

    /// Release the connection.
    async fn close(self: Box<Self>) -> Result<(), StoreError>;
}
