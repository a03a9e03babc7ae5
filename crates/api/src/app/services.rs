use std::sync::Arc;

use tracing::{instrument, warn};

use tair_infra::{
    CatalogConnection, CatalogStore, ConfigError, InMemoryCatalogStore, MySqlCatalogStore,
    StoreBackend, StoreConfig, StoreError,
};
use tair_products::{NewProduct, Product};

/// Catalog operations over an injected store.
///
/// Stateless apart from the store handle: every call opens one fresh
/// connection and releases it before returning, whatever the outcome.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let mut lease = Lease::open(self.store.as_ref()).await?;
        let result = lease.conn().fetch_products().await;
        lease.release().await;
        result
    }

    #[instrument(skip(self, new), fields(name = new.name()))]
    pub async fn create_product(&self, new: NewProduct) -> Result<Product, StoreError> {
        let mut lease = Lease::open(self.store.as_ref()).await?;
        let result = lease.conn().insert_product(&new).await;
        lease.release().await;
        Ok(Product::from_new(result?, new))
    }
}

/// An open connection that is closed on release, or in the background if the
/// request is dropped first (client disconnect).
struct Lease {
    conn: Option<Box<dyn CatalogConnection>>,
}

impl Lease {
    async fn open(store: &dyn CatalogStore) -> Result<Self, StoreError> {
        Ok(Self {
            conn: Some(store.connect().await?),
        })
    }

    fn conn(&mut self) -> &mut (dyn CatalogConnection + 'static) {
        match self.conn.as_deref_mut() {
            Some(conn) => conn,
            None => unreachable!("lease used after release"),
        }
    }

    async fn release(mut self) {
        if let Some(conn) = self.conn.take() {
            close(conn).await;
        }
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        let Some(conn) = self.conn.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(close(conn));
            }
            Err(_) => warn!("no runtime left to close an abandoned catalog store connection"),
        }
    }
}

/// Close a connection; a failed close is logged and never surfaces to the caller.
async fn close(conn: Box<dyn CatalogConnection>) {
    if let Err(e) = conn.close().await {
        warn!(error = %e, "failed to close catalog store connection");
    }
}

/// Build the service for the selected backend, reading store settings from the environment.
pub fn build_service(backend: StoreBackend) -> Result<CatalogService, ConfigError> {
    let store: Arc<dyn CatalogStore> = match backend {
        StoreBackend::MySql => {
            let config = StoreConfig::from_env()?;
            tracing::info!(?config, "using MySQL catalog store");
            Arc::new(MySqlCatalogStore::new(&config))
        }
        StoreBackend::Memory => {
            warn!("using in-memory catalog store; products are lost on restart");
            Arc::new(InMemoryCatalogStore::new())
        }
    };

    Ok(CatalogService::new(store))
}
