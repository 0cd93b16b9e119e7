#![forbid(unsafe_code)]

//! Typed query-state decoding.
//!
//! [`QueryReader`] reads the reserved keys of a [`QueryParams`] set and turns
//! them into typed values. It fails closed: every accessor either applies a
//! default or reports a [`ValidationError`], never a panic.
//!
//! # Policies
//!
//! | accessor    | absent      | malformed             | out of range            |
//! |-------------|-------------|-----------------------|-------------------------|
//! | `order_by`  | default     | default               | -                       |
//! | `try_order_by` | default  | `NotAllowed`          | -                       |
//! | `order`     | `asc`       | `NotAllowed`          | -                       |
//! | `limit`     | `per_page`  | `per_page`            | negative → `per_page`, above max → clamped |
//! | `page`      | `1`         | `NotANumber`          | below 1 → `OutOfRange`  |
//! | `minmax`    | `None`      | side becomes `None`   | -                       |
//!
//! `limit` never fails; `page` does.
//!
//! # Invariants
//!
//! 1. `offset()` is recomputed from `page()` and `limit()` on every call.
//! 2. A range filter with both bounds unset is `None`, never a zeroed range.
//! 3. [`QueryReader::state`] reports every offending key at once and never
//!    returns a partially applied state.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use urlstate_i18n::{NumberCodec, format_numeral, parse_numeral};

use crate::config::QueryConfig;
use crate::error::{IssueKind, ValidationError};
use crate::params::QueryParams;
use crate::sort::{Order, SortKey};
use crate::url::PageUrl;

// ── RangeFilter ─────────────────────────────────────────────────────────

/// Optional numeric bounds carried as `min,max` in a single parameter.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RangeFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl RangeFilter {
    /// Build a filter, or `None` when both bounds are unset.
    #[must_use]
    pub fn new(min: Option<f64>, max: Option<f64>) -> Option<Self> {
        (min.is_some() || max.is_some()).then_some(Self { min, max })
    }

    /// Parse the wire form written by [`to_param`](Self::to_param): ASCII
    /// numerals split on the first comma. A value without a comma is a lower
    /// bound only. Empty or unparsable sides are unset.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::split(raw, parse_numeral)
    }

    /// Build a filter from user-typed bounds in `codec`'s locale, e.g.
    /// `"1.234,5"` under `de`.
    ///
    /// Bounds are separate arguments: under comma-decimal locales `,` is
    /// part of the number. The URL only ever carries
    /// [`to_param`](Self::to_param), never the localized text.
    #[must_use]
    pub fn from_input(min: &str, max: &str, codec: &NumberCodec) -> Option<Self> {
        let parse = |side: &str| codec.parse(side);
        Self::new(bound(min, parse), bound(max, parse))
    }

    fn split(raw: &str, parse: impl Fn(&str) -> f64 + Copy) -> Option<Self> {
        let (min, max) = raw.split_once(',').unwrap_or((raw, ""));
        Self::new(bound(min, parse), bound(max, parse))
    }

    /// Whether `value` lies within the bounds (inclusive).
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }

    /// Wire form: `min,max` with unset sides left empty.
    #[must_use]
    pub fn to_param(&self) -> String {
        let side = |v: Option<f64>| v.map(format_numeral).unwrap_or_default();
        format!("{},{}", side(self.min), side(self.max))
    }
}

/// Empty or unparsable sides are unset.
fn bound(side: &str, parse: impl Fn(&str) -> f64) -> Option<f64> {
    let side = side.trim();
    if side.is_empty() {
        return None;
    }
    let value = parse(side);
    (!value.is_nan()).then_some(value)
}

impl fmt::Display for RangeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_param())
    }
}

// ── QueryState ──────────────────────────────────────────────────────────

/// Fully decoded query state.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<K> {
    pub order_by: K,
    pub order: Order,
    pub limit: u32,
    pub page: u32,
    pub search: Option<String>,
    /// Only fields that carry at least one bound.
    pub ranges: BTreeMap<String, RangeFilter>,
}

impl<K> QueryState<K> {
    /// Rows to skip: `(page - 1) * limit`.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }

    #[must_use]
    pub fn range(&self, field: &str) -> Option<&RangeFilter> {
        self.ranges.get(field)
    }
}

// ── QueryReader ─────────────────────────────────────────────────────────

/// Typed view over a query parameter set.
#[derive(Debug, Clone, Copy)]
pub struct QueryReader<'a> {
    params: &'a QueryParams,
    config: &'a QueryConfig,
}

impl<'a> QueryReader<'a> {
    #[must_use]
    pub fn new(params: &'a QueryParams, config: &'a QueryConfig) -> Self {
        Self { params, config }
    }

    #[must_use]
    pub fn from_url(url: &'a PageUrl, config: &'a QueryConfig) -> Self {
        Self::new(url.query(), config)
    }

    #[must_use]
    pub fn params(&self) -> &'a QueryParams {
        self.params
    }

    #[must_use]
    pub fn config(&self) -> &'a QueryConfig {
        self.config
    }

    /// Raw value of an arbitrary key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.params.get(key)
    }

    /// Sort key, falling back to `K::DEFAULT` when missing or not permitted.
    #[must_use]
    pub fn order_by<K: SortKey>(&self) -> K {
        self.try_order_by().unwrap_or(K::DEFAULT)
    }

    /// Sort key; a present value outside `K::ALL` is an error.
    pub fn try_order_by<K: SortKey>(&self) -> Result<K, ValidationError> {
        let key = &self.config.keys.sort;
        match self.get(key) {
            None => Ok(K::DEFAULT),
            Some(raw) => K::parse(raw)
                .ok_or_else(|| ValidationError::single(key, raw, IssueKind::NotAllowed)),
        }
    }

    /// Sort direction. `explicit` takes precedence over the URL.
    pub fn order(&self, explicit: Option<Order>) -> Result<Order, ValidationError> {
        if let Some(order) = explicit {
            return Ok(order);
        }
        let key = &self.config.keys.order;
        match self.get(key) {
            None => Ok(Order::default()),
            Some(raw) => Order::parse(raw)
                .ok_or_else(|| ValidationError::single(key, raw, IssueKind::NotAllowed)),
        }
    }

    /// Page size, clamped to `[0, max_limit]`. Never fails.
    #[must_use]
    pub fn limit(&self) -> u32 {
        let fallback = self.config.per_page.min(self.config.max_limit);
        let Some(raw) = self.get(&self.config.keys.limit) else {
            return fallback;
        };
        let value = parse_numeral(raw);
        if value.is_nan() || value < 0.0 {
            return fallback;
        }
        if value > f64::from(self.config.max_limit) {
            return self.config.max_limit;
        }
        value.trunc() as u32
    }

    /// One-based page number.
    pub fn page(&self) -> Result<u32, ValidationError> {
        let key = &self.config.keys.page;
        let Some(raw) = self.get(key) else {
            return Ok(1);
        };
        let value = parse_numeral(raw);
        if value.is_nan() {
            return Err(ValidationError::single(key, raw, IssueKind::NotANumber));
        }
        if value < 1.0 {
            return Err(ValidationError::single(key, raw, IssueKind::OutOfRange));
        }
        Ok(value.trunc().min(f64::from(u32::MAX)) as u32)
    }

    /// Rows to skip for the current page.
    pub fn offset(&self) -> Result<u64, ValidationError> {
        let page = self.page()?;
        Ok(u64::from(page - 1) * u64::from(self.limit()))
    }

    /// Free-text search, passed through untouched.
    #[must_use]
    pub fn search(&self) -> Option<&'a str> {
        self.get(&self.config.keys.search)
    }

    /// Range filter stored under `field`, in wire form.
    #[must_use]
    pub fn minmax(&self, field: &str) -> Option<RangeFilter> {
        self.get(field).and_then(RangeFilter::parse)
    }

    /// Comma-joined list stored under `key`, empty items skipped.
    #[must_use]
    pub fn list(&self, key: &str) -> Option<Vec<&'a str>> {
        self.get(key)
            .map(|raw| raw.split(',').filter(|item| !item.is_empty()).collect())
    }

    /// Decode everything at once.
    ///
    /// Every rejected parameter is collected into a single error.
    pub fn state<K: SortKey>(&self, range_fields: &[&str]) -> Result<QueryState<K>, ValidationError> {
        let order_by = self.try_order_by::<K>();
        let order = self.order(None);
        let page = self.page();

        let rejected = [order_by.as_ref().err(), order.as_ref().err(), page.as_ref().err()]
            .into_iter()
            .flatten()
            .cloned()
            .reduce(|mut acc, next| {
                acc.merge(next);
                acc
            });
        if let Some(error) = rejected {
            #[cfg(feature = "tracing")]
            tracing::debug!(keys = ?error.keys(), "query state rejected");
            return Err(error);
        }

        let ranges = range_fields
            .iter()
            .filter_map(|field| self.minmax(field).map(|r| (field.to_string(), r)))
            .collect();

        Ok(QueryState {
            order_by: order_by?,
            order: order?,
            limit: self.limit(),
            page: page?,
            search: self.search().map(str::to_string),
            ranges,
        })
    }
}
