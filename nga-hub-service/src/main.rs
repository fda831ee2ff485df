//! NGA Hub Service - HTTP microservice for NGA dataset summaries.
//!
//! Proxies the ArcGIS Hub search API for the NGA dataset collections and
//! serves a simplified summary list.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `NGA_HUB_PORT` | HTTP server port | 8000 |
//! | `NGA_HUB_BASE_URL` | Upstream search endpoint | ArcGIS Hub items endpoint |
//! | `NGA_HUB_TIMEOUT_SECS` | Upstream timeout in seconds | 30 |
//! | `NGA_HUB_TIME_ZONE` | Zone for `created` timestamps: "utc" or "local" | "utc" |
//! | `RUST_LOG` | Log level (e.g., "info", "debug") | "info" |
//!
//! ## Endpoints
//!
//! - `GET /` - Greeting
//! - `GET /nga-datasets` - NGA dataset summaries
//! - `GET /health` - Health check
//! - `GET /docs` - OpenAPI documentation (Swagger UI)

use std::net::SocketAddr;
use std::sync::Arc;

use nga_hub::HubClientBuilder;
use nga_hub_service::{app, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nga_hub=info,nga_hub_service=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port: u16 = std::env::var("NGA_HUB_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8000);

    // The library reads NGA_HUB_BASE_URL, NGA_HUB_TIMEOUT_SECS and NGA_HUB_TIME_ZONE
    let hub = HubClientBuilder::from_env().build()?;

    tracing::info!(
        upstream = %hub.url(),
        timeout_secs = hub.config().timeout.as_secs(),
        time_zone = ?hub.config().time_zone,
        port = port,
        "Starting NGA Hub service"
    );

    let state = Arc::new(AppState { hub });

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
