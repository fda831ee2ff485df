//! HTTP request handlers for the dataset service.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use nga_hub::{CatalogResponse, HubError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::AppState;

/// Detail returned when the upstream catalog cannot be reached.
pub const UPSTREAM_ERROR_DETAIL: &str = "Error fetching data from ArcGIS Hub";

/// Detail returned for every other failure.
pub const INTERNAL_ERROR_DETAIL: &str = "Internal server error";

/// Greeting returned by the root endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    /// Greeting text.
    pub message: String,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Fixed, client-safe error description.
    pub detail: String,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Root endpoint.
#[utoipa::path(
    get,
    path = "/",
    tag = "system",
    responses((status = 200, description = "Greeting", body = MessageResponse))
)]
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Hello World".to_string(),
    })
}

/// Get summaries of the NGA datasets published on ArcGIS Hub.
///
/// Every call queries the upstream catalog once; nothing is cached.
///
/// # Returns
///
/// - `200 OK` with the dataset envelope on success
/// - `503 Service Unavailable` if the upstream is unreachable, times out or
///   answers with an error status
/// - `500 Internal Server Error` on anything else (e.g. a malformed payload)
#[utoipa::path(
    get,
    path = "/nga-datasets",
    tag = "datasets",
    responses(
        (status = 200, description = "Dataset summaries", body = CatalogResponse),
        (status = 503, description = "Upstream catalog unavailable", body = ErrorResponse),
        (status = 500, description = "Unexpected failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(name = "nga_datasets", skip_all)]
pub async fn get_nga_datasets(State(state): State<Arc<AppState>>) -> Response {
    match state.hub.fetch_datasets().await {
        Ok(response) => {
            tracing::info!(
                total_datasets = response.total_datasets,
                "Datasets served"
            );
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// Map a fetch failure to its response, logging the real cause.
///
/// The cause is never sent to the client.
pub fn error_response(e: HubError) -> Response {
    if e.is_upstream() {
        tracing::error!(error = %e, "HTTP error occurred");
        detail_response(StatusCode::SERVICE_UNAVAILABLE, UPSTREAM_ERROR_DETAIL)
    } else {
        tracing::error!(error = %e, "Unexpected error");
        detail_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_DETAIL)
    }
}

/// Build a `{"detail": ...}` response.
pub fn detail_response(status: StatusCode, detail: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            detail: detail.to_string(),
        }),
    )
        .into_response()
}

/// Health check endpoint.
///
/// Returns service status and version.
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Fallback for unknown routes.
pub async fn not_found() -> Response {
    detail_response(StatusCode::NOT_FOUND, "Not Found")
}
