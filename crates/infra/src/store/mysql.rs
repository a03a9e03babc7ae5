//! MySQL-backed catalog store.
//!
//! Each [`CatalogStore::connect`] call opens a brand new `MySqlConnection`;
//! there is no pool. The `products` table is owned externally, this adapter
//! only reads and inserts.

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{Connection, Row};
use tracing::instrument;

use tair_products::{NewProduct, Product, ProductId};

use super::{CatalogConnection, CatalogStore, StoreError};
use crate::config::StoreConfig;

/// Connection factory for a MySQL-compatible catalog store.
#[derive(Debug, Clone)]
pub struct MySqlCatalogStore {
    options: MySqlConnectOptions,
}

impl MySqlCatalogStore {
    pub fn new(config: &StoreConfig) -> Self {
        let mut options = MySqlConnectOptions::new()
            .host(&config.host)
            .username(&config.user)
            .database(&config.database);
        if let Some(password) = &config.password {
            options = options.password(password);
        }

        Self { options }
    }
}

#[async_trait]
impl CatalogStore for MySqlCatalogStore {
    #[instrument(skip(self))]
    async fn connect(&self) -> Result<Box<dyn CatalogConnection>, StoreError> {
        let conn = MySqlConnection::connect_with(&self.options)
            .await
            .map_err(|e| StoreError::Connect(e.to_string()))?;

        Ok(Box::new(MySqlCatalogConnection { conn }))
    }
}

struct MySqlCatalogConnection {
    conn: MySqlConnection,
}

#[async_trait]
impl CatalogConnection for MySqlCatalogConnection {
    #[instrument(skip(self))]
    async fn fetch_products(&mut self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query("SELECT id, name, price FROM products")
            .fetch_all(&mut self.conn)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        rows.iter().map(row_to_product).collect()
    }

    #[instrument(skip(self, product), fields(name = product.name()))]
    async fn insert_product(&mut self, product: &NewProduct) -> Result<ProductId, StoreError> {
        let mut tx = self
            .conn
            .begin()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        // Dropping `tx` on the error paths below rolls the insert back.
        let result = sqlx::query("INSERT INTO products (name, price) VALUES (?, ?)")
            .bind(product.name())
            .bind(product.price())
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::Commit(e.to_string()))?;

        Ok(ProductId::new(result.last_insert_id()))
    }

    async fn close(self: Box<Self>) -> Result<(), StoreError> {
        self.conn
            .close()
            .await
            .map_err(|e| StoreError::Close(e.to_string()))
    }
}

fn row_to_product(row: &MySqlRow) -> Result<Product, StoreError> {
    let id = decode_id(row)?;
    let name: String = row
        .try_get("name")
        .map_err(|e| StoreError::Decode(format!("name: {e}")))?;
    let price = decode_price(row)?;

    Ok(Product { id, name, price })
}

/// `id` may be declared signed or unsigned; sqlx only decodes the matching Rust type.
fn decode_id(row: &MySqlRow) -> Result<ProductId, StoreError> {
    if let Ok(id) = row.try_get::<u64, _>("id") {
        return Ok(ProductId::new(id));
    }

    let id: i64 = row
        .try_get("id")
        .map_err(|e| StoreError::Decode(format!("id: {e}")))?;
    id_from_signed(id)
}

fn id_from_signed(id: i64) -> Result<ProductId, StoreError> {
    u64::try_from(id)
        .map(ProductId::new)
        .map_err(|_| StoreError::Decode(format!("id: negative value {id}")))
}

/// `price` is normally DECIMAL; FLOAT/DOUBLE columns are accepted as well.
fn decode_price(row: &MySqlRow) -> Result<f64, StoreError> {
    if let Ok(price) = row.try_get::<Decimal, _>("price") {
        return price_from_decimal(price);
    }
    if let Ok(price) = row.try_get::<f64, _>("price") {
        return Ok(price);
    }

    row.try_get::<f32, _>("price")
        .map(f64::from)
        .map_err(|e| StoreError::Decode(format!("price: {e}")))
}

fn price_from_decimal(price: Decimal) -> Result<f64, StoreError> {
    price
        .to_f64()
        .ok_or_else(|| StoreError::Decode(format!("price: {price} out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(password: Option<&str>) -> StoreConfig {
        StoreConfig {
            host: "db.internal".to_string(),
            user: "catalog".to_string(),
            database: "products_db".to_string(),
            password: password.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn unreachable_engine_is_a_connect_error() {
        let store = MySqlCatalogStore::new(&StoreConfig {
            host: "127.0.0.1".to_string(),
            ..config(None)
        });
        // Nothing listens on the discard port.
        let store = MySqlCatalogStore {
            options: store.options.port(9),
        };

        let err = match store.connect().await {
            Ok(_) => panic!("expected connection failure"),
            Err(e) => e,
        };
        assert!(matches!(err, StoreError::Connect(_)), "got {err:?}");
    }

    #[test]
    fn decimal_prices_become_floats() {
        assert_eq!(price_from_decimal(Decimal::new(999, 2)).unwrap(), 9.99);
        assert_eq!(price_from_decimal(Decimal::new(10, 0)).unwrap(), 10.0);
        assert_eq!(price_from_decimal(Decimal::ZERO).unwrap(), 0.0);
        assert_eq!(price_from_decimal(Decimal::new(1_234_567_89, 2)).unwrap(), 1_234_567.89);
    }

    #[test]
    fn signed_ids_must_be_non_negative() {
        assert_eq!(id_from_signed(42).unwrap(), ProductId::new(42));
        assert_eq!(id_from_signed(0).unwrap(), ProductId::new(0));

        let err = id_from_signed(-1).unwrap_err();
        assert_eq!(err, StoreError::Decode("id: negative value -1".to_string()));
    }
}
