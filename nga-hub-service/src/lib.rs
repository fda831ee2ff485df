//! NGA Hub Service Library
//!
//! HTTP handlers, router and OpenAPI document for the dataset service.
//! This library is used by both the nga-hub-service binary and integration tests.

pub mod handlers;

use std::any::Any;
use std::sync::Arc;

use axum::{http::StatusCode, response::Response, routing::get, Router};
use nga_hub::{CatalogResponse, DatasetSummary, HubClient};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across handlers.
pub struct AppState {
    /// Upstream catalog client.
    pub hub: HubClient,
}

/// OpenAPI documentation for the dataset service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "NGA Hub Dataset Service",
        version = "0.1.0",
        description = "Summaries of the NGA dataset collections published on ArcGIS Hub.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        handlers::root,
        handlers::get_nga_datasets,
        handlers::health_check,
    ),
    components(
        schemas(
            CatalogResponse,
            DatasetSummary,
            handlers::MessageResponse,
            handlers::ErrorResponse,
            handlers::HealthResponse,
        )
    ),
    tags(
        (name = "datasets", description = "Dataset catalog endpoints"),
        (name = "system", description = "System and health endpoints")
    )
)]
pub struct ApiDoc;

/// Build the service router.
pub fn app(state: Arc<AppState>) -> Router {
    let router = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(handlers::root))
        .route("/nga-datasets", get(handlers::get_nga_datasets))
        .route("/health", get(handlers::health_check))
        .fallback(handlers::not_found)
        .with_state(state);

    apply_middleware(router)
}

/// Wrap a router with request tracing, CORS and panic recovery.
///
/// A panicking handler is answered with the generic 500 response.
pub fn apply_middleware(router: Router) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(
                CorsLayer::new()
                    .allow_origin(AnyOrigin)
                    .allow_methods(AnyOrigin)
                    .allow_headers(AnyOrigin),
            )
            .layer(CatchPanicLayer::custom(panic_response)),
    )
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let reason = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(reason = reason, "Unexpected error: handler panicked");

    handlers::detail_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        handlers::INTERNAL_ERROR_DETAIL,
    )
}

// Re-export commonly used types for convenience
pub use handlers::{ErrorResponse, HealthResponse, MessageResponse};
