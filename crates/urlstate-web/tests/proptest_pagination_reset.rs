//! Property-based invariant tests for URL mutation.
//!
//! 1. Any mutation of a non-pagination key removes the pagination key.
//! 2. Setting the pagination key itself keeps it.
//! 3. Keys the mutation does not mention survive unchanged.

use proptest::prelude::*;
use urlstate_core::PageUrl;
use urlstate_web::{MemoryHistory, QueryValue, UpdaterConfig, UrlUpdater};

fn key() -> impl Strategy<Value = String> {
    "[a-z]{1,6}".prop_filter("pagination key", |k| k != "page")
}

fn value() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ,.]{0,8}"
}

fn start_url() -> impl Strategy<Value = (String, u32)> {
    (proptest::collection::vec((key(), value()), 0..4), 1u32..50).prop_map(|(pairs, page)| {
        let mut href = format!("/list?page={page}");
        for (k, v) in pairs {
            href.push('&');
            href.push_str(&k);
            href.push('=');
            href.push_str(&v.replace(' ', "+").replace(',', "%2C"));
        }
        (href, page)
    })
}

// ═════════════════════════════════════════════════════════════════════════
// 1–3. Pagination reset
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn single_mutation_resets_page((href, _) in start_url(), k in key(), v in value()) {
        let updater = UrlUpdater::new(MemoryHistory::new(&href), UpdaterConfig::default());
        let next = PageUrl::parse(&updater.preview_query(&k, v.as_str()));
        prop_assert!(!next.query().has("page"));
    }

    #[test]
    fn bulk_mutation_resets_page((href, _) in start_url(), entries in proptest::collection::vec((key(), value()), 0..4)) {
        let updater = UrlUpdater::new(MemoryHistory::new(&href), UpdaterConfig::default());
        let next = PageUrl::parse(&updater.preview_queries(
            entries.iter().map(|(k, v)| (k.as_str(), QueryValue::from(v.as_str()))),
        ));
        prop_assert!(!next.query().has("page"));
    }

    #[test]
    fn removal_resets_page((href, _) in start_url(), k in key()) {
        let history = MemoryHistory::new(&href);
        let updater = UrlUpdater::new(history.clone(), UpdaterConfig::default());
        let next = PageUrl::parse(&updater.remove_query([k.as_str()]).unwrap());
        prop_assert!(!next.query().has("page"));
        prop_assert!(!next.query().has(&k));
    }

    #[test]
    fn setting_page_keeps_page((href, _) in start_url(), page in 1u32..1000) {
        let updater = UrlUpdater::new(MemoryHistory::new(&href), UpdaterConfig::default());
        let next = PageUrl::parse(&updater.preview_query("page", page));
        let expected = page.to_string();
        prop_assert_eq!(next.query().get("page"), Some(expected.as_str()));
    }

    #[test]
    fn untouched_keys_survive((href, _) in start_url(), k in key(), v in "[a-z]{1,4}") {
        let before = PageUrl::parse(&href);
        let updater = UrlUpdater::new(MemoryHistory::new(&href), UpdaterConfig::default());
        let after = PageUrl::parse(&updater.preview_query(&k, v.as_str()));
        for (key, _) in before.query().iter() {
            if key == "page" || key == k {
                continue;
            }
            prop_assert_eq!(after.query().get(key), before.query().get(key));
        }
    }
}
