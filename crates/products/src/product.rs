use serde::{Deserialize, Serialize};

/// Product identifier, assigned by the catalog store on insert.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl ProductId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A stored catalog product.
///
/// Serialized as `{"id": .., "name": .., "price": ..}`, with the price already
/// coerced to a float regardless of the store's numeric column type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
}

impl Product {
    /// Attach a store-assigned id to a validated product.
    pub fn from_new(id: ProductId, new: NewProduct) -> Self {
        Self {
            id,
            name: new.name,
            price: new.price,
        }
    }
}

/// A validated product that has not been stored yet.
///
/// Only constructed through [`crate::CreateProductRequest::validate`] (or
/// [`NewProduct::new`] in tests and adapters), so the name is never blank and
/// the price is always finite.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    name: String,
    price: f64,
}

impl NewProduct {
    /// Returns `None` when the name is blank or the price is not finite.
    pub fn new(name: impl Into<String>, price: f64) -> Option<Self> {
        let name = name.into();
        if name.trim().is_empty() || !price.is_finite() {
            return None;
        }
        Some(Self { name, price })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> f64 {
        self.price
    }
}
