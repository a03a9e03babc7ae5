//! HTTP client for the catalog API.

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use tair_products::Product;

use crate::middleware::REQUEST_ID_HEADER;

/// Fixed budget for every API call; expiry counts as a network failure.
pub const API_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },
    #[error("parse error: {0}")]
    Parse(String),
}

/// Form fields forwarded to `POST /products` as-is. Absent fields stay absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductSubmission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
}

/// `POST /products` success body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedProduct {
    pub id: u64,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CatalogClient {
    api_url: String,
    http: reqwest::Client,
}

impl CatalogClient {
    pub fn new(api_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(api_url, API_TIMEOUT)
    }

    pub fn with_timeout(api_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Fetch the catalog. Anything but a 200 with a product array is an error.
    pub async fn list_products(&self, request_id: &str) -> Result<Vec<Product>, ClientError> {
        let url = format!("{}/products", self.api_url);
        let resp = self
            .http
            .get(&url)
            .header(REQUEST_ID_HEADER, request_id)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if resp.status() != StatusCode::OK {
            let status = resp.status();
            return Err(ClientError::Api {
                status,
                message: resp.text().await.unwrap_or_default(),
            });
        }

        resp.json().await.map_err(|e| ClientError::Parse(e.to_string()))
    }

    /// Fetch the catalog, degrading every failure to an empty list.
    pub async fn products_or_empty(&self, request_id: &str) -> Vec<Product> {
        self.list_products(request_id).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not load products; rendering empty catalog");
            Vec::new()
        })
    }

    /// Forward a submission. Non-201 answers carry the API's `error` field.
    pub async fn create_product(
        &self,
        submission: &ProductSubmission,
        request_id: &str,
    ) -> Result<CreatedProduct, ClientError> {
        let url = format!("{}/products", self.api_url);
        let resp = self
            .http
            .post(&url)
            .header(REQUEST_ID_HEADER, request_id)
            .json(submission)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = resp.status();
        if status != StatusCode::CREATED {
            let message = resp
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| format!("API responded with {status}"));
            return Err(ClientError::Api { status, message });
        }

        resp.json().await.map_err(|e| ClientError::Parse(e.to_string()))
    }
}
