#![forbid(unsafe_code)]

//! urlstate public facade crate.
//!
//! Re-exports the workspace crates under short names and offers a
//! [`prelude`] with the types a page needs.
//!
//! ```
//! use urlstate::prelude::*;
//!
//! urlstate::sort_keys! {
//!     pub enum CompanySort {
//!         #[default]
//!         Name => "name",
//!         Revenue => "revenue",
//!     }
//! }
//!
//! let url = PageUrl::parse("/companies?sort=revenue&page=2&revenue=1000%2C");
//! let config = QueryConfig::default();
//! let state = QueryReader::from_url(&url, &config)
//!     .state::<CompanySort>(&["revenue"])
//!     .unwrap();
//! assert_eq!(state.order_by, CompanySort::Revenue);
//! assert_eq!(state.offset(), 50);
//! assert_eq!(state.range("revenue").and_then(|r| r.min), Some(1000.0));
//! ```

pub use urlstate_core as core;
pub use urlstate_core::sort_keys;
pub use urlstate_i18n as i18n;
#[cfg(feature = "runtime")]
pub use urlstate_runtime as runtime;
#[cfg(feature = "web")]
pub use urlstate_web as web;

pub mod prelude {
    pub use urlstate_core::{
        IssueKind, Order, PageUrl, QueryConfig, QueryKeys, QueryParams, QueryReader, QueryState,
        RangeFilter, SortKey, ValidationError,
    };
    pub use urlstate_i18n::{CompactOptions, NumberCodec, NumberStyle, format_compact};

    #[cfg(feature = "runtime")]
    pub use urlstate_runtime::{
        Computed, Observable, ProducerError, Resource, ResourceState, Spawner, Status,
        Subscription,
    };

    #[cfg(feature = "web")]
    pub use urlstate_web::{
        ColumnStore, GotoOptions, JsonFileStorage, KeyValueStorage, MemoryHistory,
        MemoryStorage, Navigator, QueryValue, TableLoad, TableSpec, UpdaterConfig,
        UpdaterOverrides, UrlUpdater, WebError, load_table,
    };
}
