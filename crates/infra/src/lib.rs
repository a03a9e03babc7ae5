//! Infrastructure layer: catalog store adapters and configuration.

pub mod config;
pub mod store;

pub use config::{ConfigError, StoreBackend, StoreConfig};
pub use store::{
    CatalogConnection, CatalogStore, InMemoryCatalogStore, MySqlCatalogStore, StoreError,
};
