use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use tair_products::{CreateProductRequest, Product, ValidationError};

use crate::app::dto::CreatedProduct;
use crate::app::errors::ApiError;
use crate::app::services::CatalogService;

/// `GET /products`. A store failure yields 500 with an empty array; the cause is only logged.
pub async fn list_products(Extension(service): Extension<CatalogService>) -> axum::response::Response {
    match service.list_products().await {
        Ok(products) => (StatusCode::OK, Json(products)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to list products");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(Vec::<Product>::new())).into_response()
        }
    }
}

/// `POST /products`. The payload is validated before any store access.
pub async fn create_product(
    Extension(service): Extension<CatalogService>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedProduct>), ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::debug!(%rejection, "unreadable create payload");
        ValidationError::MissingField
    })?;

    let new = body.validate()?;
    let product = service.create_product(new).await?;

    tracing::info!(id = %product.id, name = %product.name, "product created");
    Ok((StatusCode::CREATED, Json(product.into())))
}
