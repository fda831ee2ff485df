//! Catalog payloads and their reduction to dataset summaries.
//!
//! The upstream search API answers with a GeoJSON-like page:
//!
//! ```text
//! {"timestamp": 1700000000000, "features": [{"properties": {...}}, ...]}
//! ```
//!
//! [`summarize`] keeps the items that are actual datasets (named, and not web
//! maps) and projects each onto a [`DatasetSummary`], preserving upstream order.

use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{HubError, Result};
use crate::timestamp::{millis_to_iso, TimeZoneMode};

/// Item type excluded from the summaries.
pub const WEB_MAP_TYPE: &str = "Web Map";

/// Title used when an item has none.
pub const DEFAULT_TITLE: &str = "No title";

/// Snippet used when an item has none.
pub const DEFAULT_SNIPPET: &str = "No description available";

/// Source used when an item has none.
pub const DEFAULT_SOURCE: &str = "Unknown source";

/// One page of upstream search results.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogPage {
    /// Upstream response time, passed through untouched.
    #[serde(default)]
    pub timestamp: Option<Value>,
    /// Matching catalog items in upstream order.
    #[serde(default)]
    pub features: Vec<CatalogItem>,
}

impl CatalogPage {
    /// Parse a raw upstream body.
    ///
    /// The top level must be a JSON object; serde would otherwise accept an
    /// empty array as a page with all fields defaulted.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body)?;
        if !value.is_object() {
            return Err(serde_json::Error::custom("catalog page is not a JSON object").into());
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// A single search result.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogItem {
    #[serde(default)]
    pub properties: ItemProperties,
}

/// The item fields the summaries are built from. Other fields are ignored.
///
/// The outer `Option` of the doubly optional fields is `None` when the field
/// is missing and `Some(None)` when it is present as `null`. Only a missing
/// field falls back to its default; a `null` is passed on as `null`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemProperties {
    /// Missing and `null` names both exclude the item.
    pub name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub title: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub snippet: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub tags: Option<Option<Vec<String>>>,
    /// Milliseconds since the Unix epoch.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub created: Option<Option<f64>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub source: Option<Option<String>>,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
}

impl ItemProperties {
    /// Whether this item is a named dataset rather than a web map.
    pub fn is_dataset(&self) -> bool {
        self.name.is_some() && self.item_type.as_deref() != Some(WEB_MAP_TYPE)
    }
}

/// Client-facing projection of a catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DatasetSummary {
    /// Item name.
    pub name: String,
    /// Human-readable title, `null` if the item has a `null` title.
    pub title: Option<String>,
    /// Short description, `null` if the item has a `null` snippet.
    pub snippet: Option<String>,
    /// Item tags, `null` if the item has `null` tags.
    pub tags: Option<Vec<String>>,
    /// Creation time as an ISO-8601 date-time without offset.
    pub created: String,
    /// Publishing organization or source, `null` if the item has a `null` source.
    pub source: Option<String>,
}

impl DatasetSummary {
    /// Build a summary from item properties.
    ///
    /// Returns `Ok(None)` for items that are not datasets (see
    /// [`ItemProperties::is_dataset`]).
    ///
    /// # Errors
    ///
    /// Fails if `created` is `null` or cannot be converted.
    pub fn from_properties(props: ItemProperties, zone: TimeZoneMode) -> Result<Option<Self>> {
        if !props.is_dataset() {
            return Ok(None);
        }
        let Some(name) = props.name else {
            return Ok(None);
        };

        let millis = match props.created {
            None => 0.0,
            Some(Some(millis)) => millis,
            Some(None) => return Err(HubError::NullField { field: "created" }),
        };
        let created = millis_to_iso(millis, zone)?;

        Ok(Some(Self {
            name,
            title: or_default(props.title, || DEFAULT_TITLE.to_string()),
            snippet: or_default(props.snippet, || DEFAULT_SNIPPET.to_string()),
            tags: or_default(props.tags, Vec::new),
            created,
            source: or_default(props.source, || DEFAULT_SOURCE.to_string()),
        }))
    }
}

/// Resolve a possibly missing, possibly `null` field. Missing gets `default`.
fn or_default<T>(field: Option<Option<T>>, default: impl FnOnce() -> T) -> Option<T> {
    field.unwrap_or_else(|| Some(default()))
}

/// The envelope returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CatalogResponse {
    /// Upstream response time, `null` if the upstream did not send one.
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub timestamp: Option<Value>,
    /// Number of entries in `datasets`.
    pub total_datasets: usize,
    /// Dataset summaries in upstream order.
    pub datasets: Vec<DatasetSummary>,
}

/// Reduce an upstream page to the client envelope.
///
/// # Errors
///
/// Fails if any kept item has a `created` value that is `null` or cannot be
/// converted.
pub fn summarize(page: CatalogPage, zone: TimeZoneMode) -> Result<CatalogResponse> {
    let datasets = page
        .features
        .into_iter()
        .filter_map(|item| DatasetSummary::from_properties(item.properties, zone).transpose())
        .collect::<Result<Vec<_>>>()?;

    Ok(CatalogResponse {
        timestamp: page.timestamp,
        total_datasets: datasets.len(),
        datasets,
    })
}
