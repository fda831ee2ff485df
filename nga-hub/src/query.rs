//! Catalog search query construction.
//!
//! The ArcGIS Hub search API filters items with an expression passed in the
//! `filter` query parameter, e.g.
//!
//! ```text
//! ((group IN (6be3552af25e468782d371f3cc867087, ...))) AND ((tags IN (NGA)))
//! ```
//!
//! [`CatalogQuery`] holds the group identifiers and tags as plain lists and
//! renders the expression, leaving URL encoding to [`reqwest::Url`].

use reqwest::Url;

use crate::error::{HubError, Result};

/// ArcGIS Hub search endpoint for items across all collections.
pub const DEFAULT_BASE_URL: &str = "https://hub.arcgis.com/api/search/v1/collections/all/items";

/// Hub groups that publish the NGA dataset collections.
pub const NGA_GROUPS: [&str; 4] = [
    "6be3552af25e468782d371f3cc867087",
    "2ceb253ed4794a8e85d6984ab4dfd394",
    "e56cdce5fe30429b90a8333b19fa84a7",
    "7a1d4174907d48cf9c4f30d49ebd7e89",
];

/// Tag every NGA dataset carries.
pub const NGA_TAG: &str = "NGA";

/// Maximum number of items requested in the single upstream page.
pub const DEFAULT_LIMIT: u32 = 50;

/// Group and tag filter for the catalog search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    /// Hub group identifiers. Items must belong to one of them.
    pub groups: Vec<String>,
    /// Tags. Items must carry one of them.
    pub tags: Vec<String>,
    /// Result limit.
    pub limit: u32,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            groups: NGA_GROUPS.iter().map(|g| g.to_string()).collect(),
            tags: vec![NGA_TAG.to_string()],
            limit: DEFAULT_LIMIT,
        }
    }
}

impl CatalogQuery {
    /// Create a query for the given groups and tags with the default limit.
    pub fn new<G, T>(groups: G, tags: T) -> Self
    where
        G: IntoIterator,
        G::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self {
            groups: groups.into_iter().map(Into::into).collect(),
            tags: tags.into_iter().map(Into::into).collect(),
            limit: DEFAULT_LIMIT,
        }
    }

    /// Set the result limit.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Render the search filter expression.
    ///
    /// Returns `None` when neither groups nor tags are set.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use nga_hub::query::CatalogQuery;
    ///
    /// let query = CatalogQuery::new(["a", "b"], ["NGA"]);
    /// assert_eq!(
    ///     query.filter_expression().unwrap(),
    ///     "((group IN (a, b))) AND ((tags IN (NGA)))"
    /// );
    /// ```
    pub fn filter_expression(&self) -> Option<String> {
        let clauses: Vec<String> = [("group", &self.groups), ("tags", &self.tags)]
            .into_iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(field, values)| format!("(({} IN ({})))", field, values.join(", ")))
            .collect();

        if clauses.is_empty() {
            None
        } else {
            Some(clauses.join(" AND "))
        }
    }

    /// Build the full search URL on top of `base_url`.
    ///
    /// Query parameters already present in `base_url` are kept.
    pub fn to_url(&self, base_url: &str) -> Result<Url> {
        let mut url = Url::parse(base_url).map_err(|e| HubError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        if url.cannot_be_a_base() {
            return Err(HubError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "URL cannot carry a path".to_string(),
            });
        }

        {
            let mut pairs = url.query_pairs_mut();
            if let Some(filter) = self.filter_expression() {
                pairs.append_pair("filter", &filter);
            }
            pairs.append_pair("limit", &self.limit.to_string());
        }

        Ok(url)
    }
}
