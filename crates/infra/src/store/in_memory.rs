use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use tair_products::{NewProduct, Product, ProductId};

use super::{CatalogConnection, CatalogStore, StoreError};

#[derive(Debug, Default)]
struct Faults {
    connect: AtomicBool,
    query: AtomicBool,
    commit: AtomicBool,
    close: AtomicBool,
    stall: AtomicBool,
}

#[derive(Debug, Default)]
struct Inner {
    rows: Mutex<Vec<Product>>,
    last_id: Mutex<u64>,
    opened: AtomicUsize,
    closed: AtomicUsize,
    faults: Faults,
}

/// Lock ignoring poisoning; no critical section here can leave the data half-written.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory catalog store.
///
/// Intended for tests/dev. Counts opened and closed connections and can be
/// told to fail at a given step, so callers' release discipline can be checked.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogStore {
    inner: Arc<Inner>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed rows with explicit ids; later inserts continue after the highest id.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let store = Self::new();
        {
            let mut rows = lock(&store.inner.rows);
            let mut last_id = lock(&store.inner.last_id);
            for product in products {
                *last_id = (*last_id).max(product.id.get());
                rows.push(product);
            }
        }
        store
    }

    pub fn products(&self) -> Vec<Product> {
        lock(&self.inner.rows).clone()
    }

    pub fn connections_opened(&self) -> usize {
        self.inner.opened.load(Ordering::SeqCst)
    }

    pub fn connections_closed(&self) -> usize {
        self.inner.closed.load(Ordering::SeqCst)
    }

    pub fn fail_connect(&self, fail: bool) {
        self.inner.faults.connect.store(fail, Ordering::SeqCst);
    }

    pub fn fail_query(&self, fail: bool) {
        self.inner.faults.query.store(fail, Ordering::SeqCst);
    }

    pub fn fail_commit(&self, fail: bool) {
        self.inner.faults.commit.store(fail, Ordering::SeqCst);
    }

    pub fn fail_close(&self, fail: bool) {
        self.inner.faults.close.store(fail, Ordering::SeqCst);
    }

    /// Make fetches and inserts hang forever, as if the engine stopped answering.
    pub fn stall_queries(&self, stall: bool) {
        self.inner.faults.stall.store(stall, Ordering::SeqCst);
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn connect(&self) -> Result<Box<dyn CatalogConnection>, StoreError> {
        if self.inner.faults.connect.load(Ordering::SeqCst) {
            return Err(StoreError::Connect("connection refused".to_string()));
        }

        self.inner.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(InMemoryConnection {
            inner: self.inner.clone(),
        }))
    }
}

struct InMemoryConnection {
    inner: Arc<Inner>,
}

impl InMemoryConnection {
    async fn check_query(&self) -> Result<(), StoreError> {
        if self.inner.faults.stall.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.inner.faults.query.load(Ordering::SeqCst) {
            return Err(StoreError::Query("table 'products' is unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogConnection for InMemoryConnection {
    async fn fetch_products(&mut self) -> Result<Vec<Product>, StoreError> {
        self.check_query().await?;

        Ok(lock(&self.inner.rows).clone())
    }

    async fn insert_product(&mut self, product: &NewProduct) -> Result<ProductId, StoreError> {
        self.check_query().await?;
        if self.inner.faults.commit.load(Ordering::SeqCst) {
            return Err(StoreError::Commit("lock wait timeout exceeded".to_string()));
        }

        let mut rows = lock(&self.inner.rows);
        let mut last_id = lock(&self.inner.last_id);
        *last_id += 1;
        let id = ProductId::new(*last_id);
        rows.push(Product::from_new(id, product.clone()));

        Ok(id)
    }

    async fn close(self: Box<Self>) -> Result<(), StoreError> {
        // Counted even when failing: the connection is gone either way.
        self.inner.closed.fetch_add(1, Ordering::SeqCst);
        if self.inner.faults.close.load(Ordering::SeqCst) {
            return Err(StoreError::Close("connection reset by peer".to_string()));
        }
        Ok(())
    }
}
