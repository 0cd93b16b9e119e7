#![no_main]

use libfuzzer_sys::fuzz_target;
use urlstate_core::{PageUrl, QueryConfig, QueryReader, sort_keys};

sort_keys! {
    enum Sort {
        #[default]
        Name => "name",
        Revenue => "revenue",
    }
}

fuzz_target!(|data: &[u8]| {
    let href = String::from_utf8_lossy(data);
    let url = PageUrl::parse(&href);
    let config = QueryConfig::default();
    let reader = QueryReader::from_url(&url, &config);

    let limit = reader.limit();
    assert!(limit <= config.max_limit);
    if let Ok(page) = reader.page() {
        assert!(page >= 1);
    }
    if let Some(range) = reader.minmax("revenue") {
        assert!(range.min.is_some() || range.max.is_some());
    }
    let _ = reader.state::<Sort>(&["revenue", "ebit"]);
    let _ = reader.list("include");
});
