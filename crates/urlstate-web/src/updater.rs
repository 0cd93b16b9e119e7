#![forbid(unsafe_code)]

//! URL state mutation.
//!
//! [`UrlUpdater`] rewrites the current location's query and hands the result
//! to a [`Navigator`]. It is the only sanctioned way to change the URL.
//!
//! # Invariants
//!
//! 1. Every mutation drops the pagination key, except the single-key form
//!    that sets the pagination key itself.
//! 2. Every navigation carries `keep_focus = true` plus the configured
//!    `replace_state`/`no_scroll`.
//! 3. The navigated href is `path?query`, or `path` when the query is empty.
//!
//! # Value rendering
//!
//! | value            | rendered                          |
//! |------------------|-----------------------------------|
//! | `Text(s)`        | `s`                               |
//! | `Number(n)`      | shortest decimal, `NaN`, `Infinity` |
//! | `List(v)`        | items joined with `,`             |
//! | `Date(d)`        | `2024-01-02T03:04:05.000Z`        |
//! | `RangeFilter`    | `min,max` as `Text`               |
//! | `Bool(b)`        | `true` / `false`                  |
//! | `Null`           | key removed                       |

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use urlstate_core::{PageUrl, QueryConfig, QueryParams, RangeFilter};
use urlstate_i18n::format_numeral;

use crate::error::Result;
use crate::navigator::{GotoOptions, Navigator};

// ── QueryValue ──────────────────────────────────────────────────────────

/// A value to store under a query key.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Null,
    Text(String),
    Number(f64),
    List(Vec<String>),
    Date(DateTime<Utc>),
    Bool(bool),
}

impl QueryValue {
    /// Wire form, or `None` for [`Null`](Self::Null).
    #[must_use]
    pub fn render(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Text(s) => Some(s.clone()),
            Self::Number(n) => Some(format_numeral(*n)),
            Self::List(items) => Some(items.join(",")),
            Self::Date(d) => Some(d.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Self::Bool(b) => Some(b.to_string()),
        }
    }

    /// Whether the single-key form removes the key: null or empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.render().is_none_or(|s| s.is_empty())
    }

    /// Whether the bulk form removes the key: null, empty, `0`, `NaN` or
    /// `false`.
    #[must_use]
    pub fn is_falsy(&self) -> bool {
        match self {
            Self::Number(n) => *n == 0.0 || n.is_nan(),
            Self::Bool(b) => !b,
            other => other.is_empty(),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for QueryValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<&[&str]> for QueryValue {
    fn from(value: &[&str]) -> Self {
        Self::List(value.iter().map(|s| (*s).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for QueryValue {
    fn from(value: [&str; N]) -> Self {
        Self::List(value.iter().map(|s| (*s).to_string()).collect())
    }
}

impl From<DateTime<Utc>> for QueryValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}

impl From<RangeFilter> for QueryValue {
    fn from(value: RangeFilter) -> Self {
        Self::Text(value.to_param())
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

// ── Configuration ───────────────────────────────────────────────────────

/// Navigation behaviour of a [`UrlUpdater`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct UpdaterConfig {
    /// Replace the current history entry instead of pushing.
    pub replace_state: bool,
    /// Keep the scroll position.
    pub no_scroll: bool,
    /// [`navigate_to`](UrlUpdater::navigate_to) carries the current query
    /// over to the new path.
    pub keep_params: bool,
}

/// Fields to override in [`UrlUpdater::with`]. `None` keeps the current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdaterOverrides {
    pub replace_state: Option<bool>,
    pub no_scroll: Option<bool>,
    pub keep_params: Option<bool>,
}

impl UpdaterConfig {
    #[must_use]
    pub fn merged(self, overrides: UpdaterOverrides) -> Self {
        Self {
            replace_state: overrides.replace_state.unwrap_or(self.replace_state),
            no_scroll: overrides.no_scroll.unwrap_or(self.no_scroll),
            keep_params: overrides.keep_params.unwrap_or(self.keep_params),
        }
    }
}

// ── UrlUpdater ──────────────────────────────────────────────────────────

/// Applies query mutations to the current location and navigates.
#[derive(Debug, Clone)]
pub struct UrlUpdater<N> {
    navigator: N,
    config: UpdaterConfig,
    query: QueryConfig,
}

impl<N: Navigator> UrlUpdater<N> {
    #[must_use]
    pub fn new(navigator: N, config: UpdaterConfig) -> Self {
        Self {
            navigator,
            config,
            query: QueryConfig::default(),
        }
    }

    /// Use `query` for key names (the pagination key in particular).
    #[must_use]
    pub fn with_query_config(mut self, query: QueryConfig) -> Self {
        self.query = query;
        self
    }

    /// Copy with a subset of the configuration overridden.
    #[must_use]
    pub fn with(&self, overrides: UpdaterOverrides) -> Self
    where
        N: Clone,
    {
        Self {
            navigator: self.navigator.clone(),
            config: self.config.merged(overrides),
            query: self.query.clone(),
        }
    }

    /// Copy bound to a different navigator.
    #[must_use]
    pub fn with_navigator<M: Navigator>(&self, navigator: M) -> UrlUpdater<M> {
        UrlUpdater {
            navigator,
            config: self.config,
            query: self.query.clone(),
        }
    }

    #[must_use]
    pub fn config(&self) -> UpdaterConfig {
        self.config
    }

    #[must_use]
    pub fn query_config(&self) -> &QueryConfig {
        &self.query
    }

    #[must_use]
    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    #[must_use]
    pub fn location(&self) -> PageUrl {
        self.navigator.location()
    }

    /// Navigate to `path`, carrying the current query when `keep_params`
    /// is set. Returns the href navigated to.
    pub fn navigate_to(&self, path: &str) -> Result<String> {
        let href = if self.config.keep_params {
            format!("{path}{}", self.location().search())
        } else {
            path.to_string()
        };
        self.go(href)
    }

    /// Set one key. An empty or null value removes it.
    pub fn set_query(&self, key: &str, value: impl Into<QueryValue>) -> Result<String> {
        let href = self.preview_query(key, value);
        self.go(href)
    }

    /// Set several keys at once. Falsy values remove their key.
    pub fn set_queries<I, K, V>(&self, entries: I) -> Result<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<QueryValue>,
    {
        let href = self.preview_queries(entries);
        self.go(href)
    }

    /// Remove every listed key.
    pub fn remove_query<I, K>(&self, keys: I) -> Result<String>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let href = self.edit(true, |params| {
            for key in keys {
                params.remove(key.as_ref());
            }
        });
        self.go(href)
    }

    /// The href [`set_query`](Self::set_query) would navigate to.
    #[must_use]
    pub fn preview_query(&self, key: &str, value: impl Into<QueryValue>) -> String {
        let value = value.into();
        let reset_page = key != self.query.keys.page;
        self.edit(reset_page, |params| match value.render() {
            Some(rendered) if !rendered.is_empty() => params.set(key, rendered),
            _ => {
                params.remove(key);
            }
        })
    }

    /// The href [`set_queries`](Self::set_queries) would navigate to.
    #[must_use]
    pub fn preview_queries<I, K, V>(&self, entries: I) -> String
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<QueryValue>,
    {
        self.edit(true, |params| {
            for (key, value) in entries {
                let value = value.into();
                match value.render() {
                    Some(rendered) if !value.is_falsy() => params.set(key.as_ref(), rendered),
                    _ => {
                        params.remove(key.as_ref());
                    }
                }
            }
        })
    }

    fn edit(&self, reset_page: bool, apply: impl FnOnce(&mut QueryParams)) -> String {
        let location = self.location();
        let mut params = location.query().clone();
        if reset_page {
            params.remove(&self.query.keys.page);
        }
        apply(&mut params);
        location.with_query(params).href()
    }

    fn go(&self, href: String) -> Result<String> {
        let options = GotoOptions {
            replace_state: self.config.replace_state,
            no_scroll: self.config.no_scroll,
            keep_focus: true,
        };
        self.navigator.goto(&href, options)?;
        Ok(href)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigator::MemoryHistory;
    use chrono::TimeZone;

    fn updater(href: &str) -> (MemoryHistory, UrlUpdater<MemoryHistory>) {
        let history = MemoryHistory::new(href);
        let updater = UrlUpdater::new(history.clone(), UpdaterConfig::default());
        (history, updater)
    }

    // ── rendering ───────────────────────────────────────────────────────

    #[test]
    fn renders_values() {
        assert_eq!(QueryValue::from(["a", "b"]).render().as_deref(), Some("a,b"));
        assert_eq!(QueryValue::from(2.5f64).render().as_deref(), Some("2.5"));
        assert_eq!(QueryValue::from(40i32).render().as_deref(), Some("40"));
        assert_eq!(QueryValue::from(false).render().as_deref(), Some("false"));
        assert_eq!(QueryValue::from(None::<&str>).render(), None);

        let date = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(
            QueryValue::from(date).render().as_deref(),
            Some("2024-01-02T03:04:05.000Z")
        );
    }

    #[test]
    fn emptiness_rules() {
        assert!(QueryValue::from("").is_empty());
        assert!(!QueryValue::from(0i32).is_empty());
        assert!(QueryValue::from(0i32).is_falsy());
        assert!(QueryValue::from(f64::NAN).is_falsy());
        assert!(QueryValue::from(false).is_falsy());
        assert!(QueryValue::List(Vec::new()).is_falsy());
        assert!(!QueryValue::from("x").is_falsy());
    }

    // ── mutation ────────────────────────────────────────────────────────

    #[test]
    fn set_query_resets_page() {
        let (history, updater) = updater("/screener?page=4&sort=name");
        let href = updater.set_query("sort", "ebit").unwrap();
        assert_eq!(href, "/screener?sort=ebit");
        assert_eq!(history.location().href(), "/screener?sort=ebit");
    }

    #[test]
    fn setting_page_keeps_it() {
        let (_, updater) = updater("/screener?page=4&sort=name");
        assert_eq!(
            updater.preview_query("page", 5u32),
            "/screener?page=5&sort=name"
        );
    }

    #[test]
    fn empty_value_removes_key() {
        let (_, updater) = updater("/screener?s=acme&sort=name");
        assert_eq!(updater.preview_query("s", ""), "/screener?sort=name");
        assert_eq!(updater.preview_query("s", None::<String>), "/screener?sort=name");
        assert_eq!(updater.preview_query("sort", 0i32), "/screener?s=acme&sort=0");
    }

    #[test]
    fn bulk_form_drops_falsy() {
        let (_, updater) = updater("/screener?revenue=1%2C&page=2");
        let href = updater.preview_queries([
            ("revenue", QueryValue::from("")),
            ("ebit", QueryValue::from("100,")),
            ("limit", QueryValue::from(0i32)),
        ]);
        assert_eq!(href, "/screener?ebit=100%2C");
    }

    #[test]
    fn localized_range_reads_back() {
        let (history, updater) = updater("/screener?page=3");
        let codec = urlstate_i18n::NumberCodec::new("de-DE");
        let typed = RangeFilter::from_input("1.234,5", "0,5", &codec);

        let href = updater.set_query("revenue", typed).unwrap();
        assert_eq!(href, "/screener?revenue=1234.5%2C0.5");

        let location = history.location();
        let config = updater.query_config();
        let reader = urlstate_core::QueryReader::from_url(&location, config);
        assert_eq!(reader.minmax("revenue"), typed);
        assert_eq!(updater.set_query("revenue", None::<RangeFilter>).unwrap(), "/screener");
    }

    #[test]
    fn remove_query_resets_page() {
        let (_, updater) = updater("/screener?page=2&a=1&b=2");
        assert_eq!(updater.remove_query(["a"]).unwrap(), "/screener?b=2");
    }

    #[test]
    fn clearing_everything_leaves_bare_path() {
        let (_, updater) = updater("/screener?s=x");
        assert_eq!(updater.set_query("s", "").unwrap(), "/screener");
    }

    // ── navigation ──────────────────────────────────────────────────────

    #[test]
    fn navigate_to_keeps_params() {
        let (history, updater) = updater("/screener?sort=ebit");
        let keep = updater.with(UpdaterOverrides {
            keep_params: Some(true),
            ..UpdaterOverrides::default()
        });
        assert_eq!(keep.navigate_to("/companies").unwrap(), "/companies?sort=ebit");
        assert_eq!(updater.navigate_to("/").unwrap(), "/");
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn options_reach_navigator() {
        let (history, updater) = updater("/");
        let quiet = updater.with(UpdaterOverrides {
            replace_state: Some(true),
            no_scroll: Some(true),
            keep_params: None,
        });
        quiet.set_query("s", "x").unwrap();
        assert_eq!(
            history.last_navigation().map(|n| n.options),
            Some(GotoOptions {
                replace_state: true,
                no_scroll: true,
                keep_focus: true
            })
        );
        assert_eq!(history.len(), 1);
        assert!(!updater.config().replace_state);
    }

    #[test]
    fn custom_page_key() {
        let mut query = QueryConfig::default();
        query.keys.page = "p".to_string();
        let history = MemoryHistory::new("/list?p=3&page=9");
        let updater =
            UrlUpdater::new(history, UpdaterConfig::default()).with_query_config(query);
        assert_eq!(updater.preview_query("s", "x"), "/list?page=9&s=x");
    }
}
