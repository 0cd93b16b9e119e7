#![forbid(unsafe_code)]

//! Web: the outer layer that moves query state through URLs.
//!
//! - [`UrlUpdater`]: every URL mutation goes through here, so the
//!   pagination reset applies uniformly.
//! - [`Navigator`]: the routing seam. [`MemoryHistory`] implements it with
//!   an in-memory entry stack and an observable current location.
//! - [`KeyValueStorage`] and [`ColumnStore`]: persisted visible columns.
//! - [`load_table`]: decode a table page's query state, redirecting to the
//!   canonical URL when the persisted columns no longer cover the sort key.

pub mod error;
pub mod navigator;
pub mod storage;
pub mod table;
pub mod updater;

pub use error::{Result, WebError};
pub use navigator::{GotoOptions, MemoryHistory, Navigation, Navigator};
pub use storage::{ColumnStore, JsonFileStorage, KeyValueStorage, MemoryStorage};
pub use table::{TableLoad, TableQuery, TableSpec, load_table, query_signal};
pub use updater::{QueryValue, UpdaterConfig, UpdaterOverrides, UrlUpdater};
