#![forbid(unsafe_code)]

//! Page location: path, query parameters, and fragment.
//!
//! Only the parts a client-side router cares about are kept. Scheme and
//! authority are dropped when parsing an absolute URL.

use std::fmt;

use crate::params::QueryParams;

/// A location inside the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageUrl {
    path: String,
    query: QueryParams,
    fragment: Option<String>,
}

impl PageUrl {
    /// Parse `href` (`/path?query#fragment`, or an absolute URL).
    #[must_use]
    pub fn parse(href: &str) -> Self {
        let href = strip_origin(href);
        let (rest, fragment) = match href.split_once('#') {
            Some((rest, frag)) => (rest, Some(frag.to_string())),
            None => (href, None),
        };
        let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
        Self {
            path: normalize_path(path),
            query: QueryParams::parse(query),
            fragment,
        }
    }

    /// Root location with an empty query.
    #[must_use]
    pub fn root() -> Self {
        Self::parse("/")
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    #[must_use]
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// The search string: `?` plus the query, or empty when there is none.
    #[must_use]
    pub fn search(&self) -> String {
        if self.query.is_empty() {
            String::new()
        } else {
            format!("?{}", self.query)
        }
    }

    /// Same path with a replaced query. The fragment is dropped.
    #[must_use]
    pub fn with_query(&self, query: QueryParams) -> Self {
        Self {
            path: self.path.clone(),
            query,
            fragment: None,
        }
    }

    /// Resolve `href` against this location.
    ///
    /// `?query` keeps the path, `#frag` keeps path and query, `/abs` replaces
    /// everything, and a bare relative path replaces the last path segment.
    #[must_use]
    pub fn resolve(&self, href: &str) -> Self {
        if href.is_empty() {
            return self.clone();
        }
        if href.starts_with('#') {
            return Self {
                fragment: Some(href[1..].to_string()),
                ..self.clone()
            };
        }
        if href.starts_with('?') {
            let mut next = Self::parse(href);
            next.path = self.path.clone();
            return next;
        }
        if href.starts_with('/') || href.contains("://") {
            return Self::parse(href);
        }
        let base = match self.path.rfind('/') {
            Some(idx) => &self.path[..=idx],
            None => "/",
        };
        Self::parse(&format!("{base}{href}"))
    }

    /// Render as `path?query#fragment`.
    #[must_use]
    pub fn href(&self) -> String {
        let mut out = format!("{}{}", self.path, self.search());
        if let Some(frag) = &self.fragment {
            out.push('#');
            out.push_str(frag);
        }
        out
    }
}

impl Default for PageUrl {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for PageUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href())
    }
}

fn strip_origin(href: &str) -> &str {
    match href.split_once("://") {
        Some((_, rest)) => rest.find(['/', '?', '#']).map_or("", |idx| &rest[idx..]),
        None => href,
    }
}

/// Collapse `.`/`..` segments and guarantee a leading slash.
fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    let trailing = path.len() > 1 && path.ends_with('/') && !segments.is_empty();
    let mut out = format!("/{}", segments.join("/"));
    if trailing {
        out.push('/');
    }
    out
}
