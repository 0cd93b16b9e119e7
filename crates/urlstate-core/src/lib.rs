#![forbid(unsafe_code)]

//! Core: query parameter sets, page URLs, and typed query-state decoding.
//!
//! A [`PageUrl`] carries an ordered [`QueryParams`] set. [`QueryReader`]
//! decodes that set into a [`QueryState`] using a [`QueryConfig`] for key
//! names and pagination limits and a caller-supplied [`SortKey`] enumeration.

pub mod config;
pub mod error;
pub mod params;
pub mod query;
pub mod sort;
pub mod url;

pub use config::{QueryConfig, QueryKeys};
pub use error::{IssueKind, ValidationError, ValidationIssue};
pub use params::QueryParams;
pub use query::{QueryReader, QueryState, RangeFilter};
pub use sort::{Order, SortKey};
pub use url::PageUrl;
