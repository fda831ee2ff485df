//! Upstream client for the ArcGIS Hub search API.
//!
//! [`HubClient`] issues exactly one GET per call against a search URL that is
//! built once from a [`CatalogQuery`]. Nothing is retried or cached.
//!
//! ```ignore
//! use nga_hub::HubClientBuilder;
//!
//! let client = HubClientBuilder::from_env().build()?;
//! let response = client.fetch_datasets().await?;
//! println!("{} datasets", response.total_datasets);
//! ```

use std::time::Duration;

use reqwest::{redirect, Client, Url};

use crate::catalog::{summarize, CatalogPage, CatalogResponse};
use crate::error::{HubError, Result};
use crate::query::{CatalogQuery, DEFAULT_BASE_URL};
use crate::timestamp::TimeZoneMode;

/// Default upstream timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for [`HubClient`].
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Search endpoint the query parameters are appended to.
    pub base_url: String,
    /// Groups, tags and limit of the search.
    pub query: CatalogQuery,
    /// Bound on the whole upstream exchange, connect through body.
    pub timeout: Duration,
    /// Zone in which `created` timestamps are rendered.
    pub time_zone: TimeZoneMode,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            query: CatalogQuery::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            time_zone: TimeZoneMode::default(),
        }
    }
}

/// Builder for [`HubClient`].
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use nga_hub::{HubClientBuilder, TimeZoneMode};
///
/// let client = HubClientBuilder::new()
///     .base_url("http://localhost:9000/items")
///     .timeout(Duration::from_secs(5))
///     .time_zone(TimeZoneMode::Local)
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct HubClientBuilder {
    config: HubConfig,
}

impl HubClientBuilder {
    /// Create a builder with the default NGA query against ArcGIS Hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder configured from environment variables.
    ///
    /// # Environment Variables
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `NGA_HUB_BASE_URL` | Upstream search endpoint | ArcGIS Hub items endpoint |
    /// | `NGA_HUB_TIMEOUT_SECS` | Upstream timeout in seconds | 30 |
    /// | `NGA_HUB_TIME_ZONE` | `utc` or `local` | `utc` |
    ///
    /// Values that cannot be parsed are ignored.
    pub fn from_env() -> Self {
        let mut builder = Self::new();

        if let Ok(base_url) = std::env::var("NGA_HUB_BASE_URL") {
            if !base_url.trim().is_empty() {
                builder = builder.base_url(base_url.trim());
            }
        }

        if let Some(secs) = std::env::var("NGA_HUB_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
        {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        if let Some(zone) = std::env::var("NGA_HUB_TIME_ZONE")
            .ok()
            .and_then(|s| TimeZoneMode::from_name(&s))
        {
            builder = builder.time_zone(zone);
        }

        builder
    }

    /// Set the upstream search endpoint.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Set the search query.
    pub fn query(mut self, query: CatalogQuery) -> Self {
        self.config.query = query;
        self
    }

    /// Set the upstream timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the zone for `created` timestamps.
    pub fn time_zone(mut self, zone: TimeZoneMode) -> Self {
        self.config.time_zone = zone;
        self
    }

    /// The configuration collected so far.
    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    /// Build the [`HubClient`].
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot be parsed or the HTTP client
    /// cannot be created (e.g., due to TLS initialization failure).
    pub fn build(self) -> Result<HubClient> {
        let url = self.config.query.to_url(&self.config.base_url)?;

        let http = Client::builder()
            .timeout(self.config.timeout)
            .redirect(redirect::Policy::none())
            .build()
            .map_err(HubError::ClientBuild)?;

        Ok(HubClient {
            http,
            url,
            config: self.config,
        })
    }
}

/// Client for the catalog search endpoint.
///
/// Cloning is cheap and shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HubClient {
    http: Client,
    url: Url,
    config: HubConfig,
}

impl HubClient {
    /// Create a client with the default configuration.
    pub fn new() -> Result<Self> {
        HubClientBuilder::new().build()
    }

    /// Create a builder.
    pub fn builder() -> HubClientBuilder {
        HubClientBuilder::new()
    }

    /// The search URL every request goes to.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    /// Fetch and parse one page of search results.
    ///
    /// # Errors
    ///
    /// - [`HubError::Transport`] if the request fails or times out
    /// - [`HubError::Status`] if the upstream answers with a non-2xx status
    /// - [`HubError::Json`] if the body is not a catalog page
    pub async fn fetch_page(&self) -> Result<CatalogPage> {
        tracing::debug!(url = %self.url, "Querying catalog");

        let response = self
            .http
            .get(self.url.clone())
            .send()
            .await
            .map_err(HubError::Transport)?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "Catalog responded");
        if !status.is_success() {
            return Err(HubError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(HubError::Transport)?;
        CatalogPage::from_slice(&body)
    }

    /// Fetch the catalog and reduce it to dataset summaries.
    pub async fn fetch_datasets(&self) -> Result<CatalogResponse> {
        let page = self.fetch_page().await?;
        let features = page.features.len();
        let response = summarize(page, self.config.time_zone)?;

        tracing::info!(
            features = features,
            datasets = response.total_datasets,
            "Catalog summarized"
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    const ITEMS_PATH: &str = "/api/search/v1/collections/all/items";

    fn client_for(server: &Server) -> HubClient {
        HubClientBuilder::new()
            .base_url(format!("{}{}", server.url(), ITEMS_PATH))
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap()
    }

    fn default_query_matcher() -> Matcher {
        let filter = CatalogQuery::default().filter_expression().unwrap();
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("filter".into(), filter),
            Matcher::UrlEncoded("limit".into(), "50".into()),
        ])
    }

    #[test]
    fn test_builder_defaults() {
        let client = HubClientBuilder::new().build().unwrap();
        assert_eq!(client.url().host_str(), Some("hub.arcgis.com"));
        assert_eq!(client.config().timeout, Duration::from_secs(30));
        assert_eq!(client.config().time_zone, TimeZoneMode::Utc);
        assert_eq!(client.config().query, CatalogQuery::default());
    }

    #[test]
    fn test_builder_invalid_base_url() {
        let result = HubClientBuilder::new().base_url("::nope::").build();
        assert!(matches!(result, Err(HubError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_from_env() {
        // Save original values
        let vars = ["NGA_HUB_BASE_URL", "NGA_HUB_TIMEOUT_SECS", "NGA_HUB_TIME_ZONE"];
        let originals: Vec<Option<String>> = vars.iter().map(|v| std::env::var(v).ok()).collect();

        for var in vars {
            std::env::remove_var(var);
        }
        let builder = HubClientBuilder::from_env();
        assert_eq!(builder.config().base_url, DEFAULT_BASE_URL);
        assert_eq!(builder.config().timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(builder.config().time_zone, TimeZoneMode::Utc);

        std::env::set_var("NGA_HUB_BASE_URL", "http://localhost:9000/items");
        std::env::set_var("NGA_HUB_TIMEOUT_SECS", "5");
        std::env::set_var("NGA_HUB_TIME_ZONE", "local");
        let builder = HubClientBuilder::from_env();
        assert_eq!(builder.config().base_url, "http://localhost:9000/items");
        assert_eq!(builder.config().timeout, Duration::from_secs(5));
        assert_eq!(builder.config().time_zone, TimeZoneMode::Local);

        // Unparsable values fall back to defaults
        std::env::set_var("NGA_HUB_TIMEOUT_SECS", "soon");
        std::env::set_var("NGA_HUB_TIME_ZONE", "mars");
        let builder = HubClientBuilder::from_env();
        assert_eq!(builder.config().timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(builder.config().time_zone, TimeZoneMode::Utc);

        // Restore original values
        for (var, original) in vars.iter().zip(originals) {
            match original {
                Some(v) => std::env::set_var(var, v),
                None => std::env::remove_var(var),
            }
        }
    }

    #[tokio::test]
    async fn test_fetch_datasets_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", ITEMS_PATH)
            .match_query(default_query_matcher())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"timestamp": 123, "features": [
                    {"properties": {"name": "a", "type": "Feature Layer", "created": 1000}},
                    {"properties": {"name": "m", "type": "Web Map"}}
                ]}"#,
            )
            .create_async()
            .await;

        let response = client_for(&server).fetch_datasets().await.unwrap();
        assert_eq!(response.timestamp, Some(serde_json::json!(123)));
        assert_eq!(response.total_datasets, 1);
        assert_eq!(response.datasets[0].name, "a");
        assert_eq!(response.datasets[0].created, "1970-01-01T00:00:01");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_http_error_status() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", ITEMS_PATH)
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("Internal Server Error")
            .create_async()
            .await;

        let err = client_for(&server).fetch_datasets().await.unwrap_err();
        assert!(matches!(err, HubError::Status { status: 500 }));
        assert!(err.is_upstream());

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_redirect_is_an_error_status() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", ITEMS_PATH)
            .match_query(Matcher::Any)
            .with_status(302)
            .with_header("location", "http://example.com/")
            .create_async()
            .await;

        let err = client_for(&server).fetch_page().await.unwrap_err();
        assert!(matches!(err, HubError::Status { status: 302 }));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_invalid_json() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", ITEMS_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("this is not json")
            .create_async()
            .await;

        let err = client_for(&server).fetch_datasets().await.unwrap_err();
        assert!(matches!(err, HubError::Json(_)));
        assert!(!err.is_upstream());

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Bind and drop a listener to get a port nobody listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HubClientBuilder::new()
            .base_url(format!("http://{}{}", addr, ITEMS_PATH))
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        let err = client.fetch_datasets().await.unwrap_err();
        assert!(matches!(err, HubError::Transport(_)));
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        // Accept connections but never answer.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let silent = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let client = HubClientBuilder::new()
            .base_url(format!("http://{}{}", addr, ITEMS_PATH))
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();

        let err = client.fetch_datasets().await.unwrap_err();
        match &err {
            HubError::Transport(e) => assert!(e.is_timeout()),
            other => panic!("Expected transport timeout, got {other:?}"),
        }
        assert!(err.is_upstream());

        silent.abort();
    }
}
