//! # NGA Hub - Dataset catalog client
//!
//! Queries the ArcGIS Hub search API for the dataset collections published by
//! the National Geospatial-Intelligence Agency (NGA) and reduces the results
//! to a compact list of dataset summaries.
//!
//! ## Features
//!
//! - **One request**: a single upstream GET per fetch, bounded by a timeout
//! - **Structured query**: group ids, tags and limit instead of a hand-encoded filter string
//! - **Typed payloads**: upstream pages are decoded with serde; anything unexpected is an error
//!
//! ## Quick Start
//!
//! ```ignore
//! use nga_hub::HubClient;
//!
//! let client = HubClient::new()?;
//! let response = client.fetch_datasets().await?;
//! for dataset in &response.datasets {
//!     println!("{}: {}", dataset.name, dataset.created);
//! }
//! ```
//!
//! ## Error classes
//!
//! [`HubError::is_upstream`] separates failures of the upstream service
//! (unreachable, timed out, non-2xx status) from everything else. Callers that
//! serve the results over HTTP map the former to 503 and the latter to 500.

pub mod catalog;
pub mod client;
pub mod error;
pub mod query;
pub mod timestamp;

// Re-export main types at crate root for convenience
pub use catalog::{summarize, CatalogPage, CatalogResponse, DatasetSummary};
pub use client::{HubClient, HubClientBuilder, HubConfig};
pub use error::{HubError, Result};
pub use query::CatalogQuery;
pub use timestamp::TimeZoneMode;
