#![forbid(unsafe_code)]

//! Table page loading.
//!
//! [`load_table`] decodes a table page's query state and reconciles it with
//! the persisted visible columns. When a remembered column set no longer
//! contains the resolved sort key, the URL is rewritten to the default sort
//! through the updater instead of returning rows sorted by a hidden column.

use tracing::{debug, warn};
use urlstate_core::{PageUrl, QueryConfig, QueryReader, QueryState, SortKey, ValidationError};
use urlstate_runtime::{Computed, Observable};

use crate::error::Result;
use crate::navigator::Navigator;
use crate::storage::{ColumnStore, KeyValueStorage};
use crate::updater::UrlUpdater;

/// Static description of one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    /// Storage identity, e.g. `screener`.
    pub table: String,
    /// Always-present columns, listed first.
    pub base_columns: Vec<String>,
    /// Visible columns when nothing is persisted.
    pub default_columns: Vec<String>,
    /// Keys decoded as `min,max` range filters.
    pub range_fields: Vec<String>,
}

impl TableSpec {
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            base_columns: Vec::new(),
            default_columns: Vec::new(),
            range_fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_base_columns<C: AsRef<str>>(mut self, columns: &[C]) -> Self {
        self.base_columns = to_owned(columns);
        self
    }

    #[must_use]
    pub fn with_default_columns<C: AsRef<str>>(mut self, columns: &[C]) -> Self {
        self.default_columns = to_owned(columns);
        self
    }

    #[must_use]
    pub fn with_range_fields<C: AsRef<str>>(mut self, fields: &[C]) -> Self {
        self.range_fields = to_owned(fields);
        self
    }
}

fn to_owned<C: AsRef<str>>(items: &[C]) -> Vec<String> {
    items.iter().map(|c| c.as_ref().to_string()).collect()
}

/// Everything a table needs to request its rows.
#[derive(Debug, Clone, PartialEq)]
pub struct TableQuery<K> {
    pub state: QueryState<K>,
    /// Base columns followed by visible columns, without duplicates.
    pub columns: Vec<String>,
    /// Related resources to embed, from the `include` key.
    pub include: Option<Vec<String>>,
}

/// Outcome of [`load_table`].
#[derive(Debug, Clone, PartialEq)]
pub enum TableLoad<K> {
    /// Navigated to a canonical URL; the caller loads again from there.
    Redirected { href: String },
    Ready(TableQuery<K>),
}

/// Decode the current location for `spec`.
///
/// # Errors
///
/// [`WebError::Validation`](crate::WebError::Validation) when the query is
/// invalid, or a navigation error from the redirect. Storage failures are
/// logged and treated as "nothing persisted".
pub fn load_table<K, N, S>(updater: &UrlUpdater<N>, storage: S, spec: &TableSpec) -> Result<TableLoad<K>>
where
    K: SortKey,
    N: Navigator,
    S: KeyValueStorage,
{
    let location = updater.location();
    let config = updater.query_config();
    let reader = QueryReader::from_url(&location, config);
    let range_fields: Vec<&str> = spec.range_fields.iter().map(String::as_str).collect();
    let state = reader.state::<K>(&range_fields)?;

    let persisted = ColumnStore::new(storage)
        .load(&spec.table)
        .unwrap_or_else(|err| {
            warn!(table = %spec.table, error = %err, "persisted columns unreadable");
            None
        });

    let visible = match persisted {
        Some(columns) => {
            let sort = state.order_by.as_str();
            let shown = spec.base_columns.iter().chain(&columns).any(|c| c == sort);
            if !shown && state.order_by != K::DEFAULT {
                debug!(table = %spec.table, sort, "sort column hidden, redirecting");
                let href = updater.set_query(&config.keys.sort, K::DEFAULT.as_str())?;
                return Ok(TableLoad::Redirected { href });
            }
            columns
        }
        None => spec.default_columns.clone(),
    };

    let mut columns = spec.base_columns.clone();
    for column in visible {
        if !columns.contains(&column) {
            columns.push(column);
        }
    }

    let include = reader
        .list(&config.keys.include)
        .map(|items| items.into_iter().map(str::to_string).collect());

    Ok(TableLoad::Ready(TableQuery {
        state,
        columns,
        include,
    }))
}

/// Query state of the current location, recomputed lazily on navigation.
#[must_use]
pub fn query_signal<K: SortKey>(
    location: &Observable<PageUrl>,
    config: QueryConfig,
    range_fields: Vec<String>,
) -> Computed<std::result::Result<QueryState<K>, ValidationError>> {
    Computed::from_observable(location, move |url| {
        let fields: Vec<&str> = range_fields.iter().map(String::as_str).collect();
        QueryReader::from_url(url, &config).state::<K>(&fields)
    })
}
