use axum::{http::StatusCode, Json};

use crate::app::dto::HealthStatus;

/// Liveness probe; never touches the store.
pub async fn health() -> (StatusCode, Json<HealthStatus>) {
    (StatusCode::OK, Json(HealthStatus { status: "API is running" }))
}
