//! Create-product request schema and validation.
//!
//! The payload is deserialized into [`CreateProductRequest`] first and then
//! validated into a [`NewProduct`]. Validation never touches the store.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use serde_json::value::RawValue;
use thiserror::Error;

use crate::product::NewProduct;

/// Client-caused failure of a create request.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// The payload is absent, not an object, or lacks `name` / `price`.
    #[error("Missing name or price")]
    MissingField,

    /// `price` is present but cannot be read as a finite number.
    #[error("Invalid price format")]
    InvalidPrice,
}

/// Price as submitted by a client: a JSON number or a numeric string.
///
/// The field is captured as a raw JSON literal first, so a wrongly typed
/// price, or a number the parser cannot represent (`1e400`), is reported as
/// an invalid price rather than a malformed payload.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceInput {
    Number(f64),
    Text(String),
    /// Any other literal, kept verbatim.
    Other(String),
}

impl PriceInput {
    /// Classify one raw JSON literal.
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Number(n)) => match n.as_f64() {
                Some(f) => PriceInput::Number(f),
                None => PriceInput::Other(raw.to_string()),
            },
            Ok(Value::String(s)) => PriceInput::Text(s),
            _ => PriceInput::Other(raw.trim().to_string()),
        }
    }

    /// Convert to a finite float.
    pub fn to_f64(&self) -> Result<f64, ValidationError> {
        let value = match self {
            PriceInput::Number(n) => *n,
            PriceInput::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| ValidationError::InvalidPrice)?,
            PriceInput::Other(_) => return Err(ValidationError::InvalidPrice),
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(ValidationError::InvalidPrice)
        }
    }
}

impl<'de> Deserialize<'de> for PriceInput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        Ok(PriceInput::from_json(raw.get()))
    }
}

/// `POST /products` body. Unknown keys are ignored; `null` counts as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProductRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<PriceInput>,
}

impl CreateProductRequest {
    pub fn new(name: impl Into<String>, price: PriceInput) -> Self {
        Self {
            name: Some(name.into()),
            price: Some(price),
        }
    }

    /// Check presence first, then the price format.
    pub fn validate(self) -> Result<NewProduct, ValidationError> {
        let (Some(name), Some(price)) = (self.name, self.price) else {
            return Err(ValidationError::MissingField);
        };
        if name.trim().is_empty() {
            return Err(ValidationError::MissingField);
        }

        let price = price.to_f64()?;
        NewProduct::new(name, price).ok_or(ValidationError::InvalidPrice)
    }
}
