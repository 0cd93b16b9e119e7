#![forbid(unsafe_code)]

//! Query-state configuration: reserved key names and pagination limits.

use serde::Deserialize;

/// Reserved query string keys.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QueryKeys {
    pub sort: String,
    pub order: String,
    pub page: String,
    pub limit: String,
    pub search: String,
    /// Comma-joined list of related resources to embed.
    pub include: String,
}

impl Default for QueryKeys {
    fn default() -> Self {
        Self {
            sort: "sort".to_string(),
            order: "order".to_string(),
            page: "page".to_string(),
            limit: "limit".to_string(),
            search: "s".to_string(),
            include: "include".to_string(),
        }
    }
}

/// Decoding configuration shared by readers and updaters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub keys: QueryKeys,
    /// Page size used when `limit` is absent or invalid.
    pub per_page: u32,
    /// Upper bound `limit` is clamped to.
    pub max_limit: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            keys: QueryKeys::default(),
            per_page: 50,
            max_limit: 100,
        }
    }
}

impl QueryConfig {
    /// Number of pages needed for `total` rows at the configured page size.
    /// Never less than one.
    #[must_use]
    pub fn total_pages(&self, total: u64) -> u64 {
        let per_page = u64::from(self.per_page.max(1));
        total.div_ceil(per_page).max(1)
    }
}
