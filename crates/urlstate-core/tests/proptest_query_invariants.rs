//! Property-based invariant tests for query decoding.
//!
//! 1. `limit()` always lies in `[0, max_limit]` and never fails.
//! 2. `page()` is either an error or at least 1.
//! 3. `offset()` always equals `(page - 1) * limit`.
//! 4. Decoding never panics on arbitrary query strings.
//! 5. A range filter, when present, has at least one bound.

use proptest::prelude::*;
use urlstate_core::{QueryConfig, QueryParams, QueryReader, RangeFilter, sort_keys};

sort_keys! {
    enum Sort {
        #[default]
        Name => "name",
        Price => "price",
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn numeric_text() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<i64>().prop_map(|n| n.to_string()),
        any::<f64>().prop_map(|f| f.to_string()),
        "[-+0-9.eE]{0,8}",
        "\\PC{0,8}",
    ]
}

fn params_with(key: &str, value: &str) -> QueryParams {
    [(key, value)].into_iter().collect()
}

// ═════════════════════════════════════════════════════════════════════════
// 1–3. Pagination
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn limit_stays_in_bounds(raw in numeric_text()) {
        let config = QueryConfig::default();
        let params = params_with("limit", &raw);
        let limit = QueryReader::new(&params, &config).limit();
        prop_assert!(limit <= config.max_limit);
    }

    #[test]
    fn page_is_positive_or_rejected(raw in numeric_text()) {
        let config = QueryConfig::default();
        let params = params_with("page", &raw);
        if let Ok(page) = QueryReader::new(&params, &config).page() {
            prop_assert!(page >= 1);
        }
    }

    #[test]
    fn offset_is_derived(page in 1u32..10_000, limit in 0u32..=100) {
        let config = QueryConfig::default();
        let params: QueryParams = [("page", page.to_string()), ("limit", limit.to_string())]
            .into_iter()
            .collect();
        let reader = QueryReader::new(&params, &config);
        prop_assert_eq!(reader.offset(), Ok(u64::from(page - 1) * u64::from(limit)));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. No panics
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn decoding_never_panics(query in "\\PC{0,64}") {
        let config = QueryConfig::default();
        let params = QueryParams::parse(&query);
        let reader = QueryReader::new(&params, &config);
        let _ = reader.state::<Sort>(&["price", "volume"]);
        let _ = reader.order_by::<Sort>();
        let _ = reader.list("include");
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Range filters
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn range_has_a_bound(raw in "\\PC{0,16}") {
        if let Some(range) = RangeFilter::parse(&raw) {
            prop_assert!(range.min.is_some() || range.max.is_some());
        }
    }

    #[test]
    fn range_param_reparses(min in proptest::option::of(-1.0e9f64..1.0e9), max in proptest::option::of(-1.0e9f64..1.0e9)) {
        let min = min.map(|v| (v * 100.0).round() / 100.0);
        let max = max.map(|v| (v * 100.0).round() / 100.0);
        match RangeFilter::new(min, max) {
            None => prop_assert!(min.is_none() && max.is_none()),
            Some(range) => prop_assert_eq!(RangeFilter::parse(&range.to_param()), Some(range)),
        }
    }
}
