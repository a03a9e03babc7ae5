//! Storefront routes.

use axum::{
    extract::{rejection::FormRejection, Extension, Form},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::client::{CatalogClient, ClientError, ProductSubmission};
use crate::middleware::{self, RequestId};
use crate::render::render_home;

pub fn build_app(client: CatalogClient) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/products", post(add_product))
        .route("/health", get(health))
        .layer(Extension(client))
        .layer(axum::middleware::from_fn(middleware::request_context))
}

/// Always 200; an unreachable or failing API renders as an empty catalog.
pub async fn home(
    Extension(client): Extension<CatalogClient>,
    Extension(RequestId(request_id)): Extension<RequestId>,
) -> Html<String> {
    let products = client.products_or_empty(&request_id).await;
    Html(render_home(&products))
}

/// Forward the form to the API; on success go back to the catalog.
pub async fn add_product(
    Extension(client): Extension<CatalogClient>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    form: Result<Form<ProductSubmission>, FormRejection>,
) -> axum::response::Response {
    let submission = match form {
        Ok(Form(s)) => s,
        Err(rejection) => {
            tracing::debug!(%rejection, "unreadable form; forwarding empty submission");
            ProductSubmission::default()
        }
    };

    match client.create_product(&submission, &request_id).await {
        Ok(created) => {
            tracing::info!(id = created.id, name = %created.name, "product added via storefront");
            Redirect::to("/").into_response()
        }
        Err(ClientError::Api { status, message }) => {
            tracing::info!(%status, %message, "API rejected product");
            (status, Json(json!({ "error": message }))).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not reach API");
            (StatusCode::BAD_GATEWAY, Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "Storefront is running" }))
}
