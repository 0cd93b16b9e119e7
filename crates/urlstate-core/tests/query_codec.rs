//! Query decoding against realistic screener URLs.

use urlstate_core::{
    IssueKind, Order, PageUrl, QueryConfig, QueryParams, QueryReader, RangeFilter, SortKey,
    sort_keys,
};
use urlstate_i18n::NumberCodec;

sort_keys! {
    pub enum Column {
        #[default]
        Name => "name",
        MarketCap => "market_cap",
        Revenue => "revenue",
        Ebit => "ebit",
    }
}

fn decode(href: &str) -> (PageUrl, QueryConfig) {
    (PageUrl::parse(href), QueryConfig::default())
}

#[test]
fn screener_url_decodes() {
    let (url, config) = decode(
        "/screener?sort=market_cap&order=desc&page=3&limit=50&s=bank&revenue=1000%2C&ebit=%2C500",
    );
    let reader = QueryReader::from_url(&url, &config);

    assert_eq!(reader.order_by::<Column>(), Column::MarketCap);
    assert_eq!(reader.order(None), Ok(Order::Desc));
    assert_eq!(reader.page(), Ok(3));
    assert_eq!(reader.limit(), 50);
    assert_eq!(reader.offset(), Ok(100));
    assert_eq!(reader.search(), Some("bank"));
    assert_eq!(
        reader.minmax("revenue"),
        Some(RangeFilter { min: Some(1000.0), max: None })
    );
    assert_eq!(
        reader.minmax("ebit"),
        Some(RangeFilter { min: None, max: Some(500.0) })
    );
}

#[test]
fn empty_url_uses_defaults() {
    let (url, config) = decode("/screener");
    let state = QueryReader::from_url(&url, &config)
        .state::<Column>(&["revenue"])
        .unwrap();
    assert_eq!(state.order_by, Column::DEFAULT);
    assert_eq!(state.order, Order::Asc);
    assert_eq!(state.page, 1);
    assert_eq!(state.limit, config.per_page);
    assert_eq!(state.offset(), 0);
    assert_eq!(state.search, None);
    assert!(state.ranges.is_empty());
}

#[test]
fn limit_and_page_policies_differ() {
    let (url, config) = decode("/?limit=500&page=0");
    let reader = QueryReader::from_url(&url, &config);
    assert_eq!(reader.limit(), 100);
    assert_eq!(
        reader.page().unwrap_err().kind_of("page"),
        Some(IssueKind::OutOfRange)
    );
}

#[test]
fn empty_values_read_as_absent() {
    let (url, config) = decode("/?page=&limit=&sort=&s=");
    let reader = QueryReader::from_url(&url, &config);
    assert_eq!(reader.page(), Ok(1));
    assert_eq!(reader.limit(), 50);
    assert_eq!(reader.try_order_by::<Column>(), Ok(Column::Name));
    assert_eq!(reader.search(), None);
}

#[test]
fn localized_range_round_trips_through_url() {
    let codec = NumberCodec::new("de-DE");
    for (min, max) in [("1.234,5", "0,5"), ("-12,75", ""), ("", "1.000.000")] {
        let typed = RangeFilter::from_input(min, max, &codec).unwrap();

        let mut params = QueryParams::new();
        params.set("revenue", typed.to_param());
        let url = PageUrl::parse("/screener").with_query(params);

        let reparsed = PageUrl::parse(&url.href());
        let config = QueryConfig::default();
        let decoded = QueryReader::from_url(&reparsed, &config).minmax("revenue");
        assert_eq!(decoded, Some(typed), "{min:?},{max:?} via {}", url.href());
    }
}

#[test]
fn grouped_numerals_in_url_are_not_numbers() {
    let (url, config) = decode("/?revenue=1%C2%A0000%2C5");
    let reader = QueryReader::from_url(&url, &config);
    assert_eq!(reader.minmax("revenue"), Some(RangeFilter { min: None, max: Some(5.0) }));
}

#[test]
fn error_message_names_offending_keys() {
    let (url, config) = decode("/?sort=price&page=abc");
    let err = QueryReader::from_url(&url, &config)
        .state::<Column>(&[])
        .unwrap_err();
    assert_eq!(err.kind_of("sort"), Some(IssueKind::NotAllowed));
    assert_eq!(err.kind_of("page"), Some(IssueKind::NotANumber));
    let message = err.to_string();
    assert!(message.contains("sort=\"price\""), "{message}");
    assert!(message.contains("page=\"abc\""), "{message}");
}

#[test]
fn unknown_keys_pass_through() {
    let (url, config) = decode("/?include=sector,country&foo=bar");
    let reader = QueryReader::from_url(&url, &config);
    assert_eq!(reader.list("include"), Some(vec!["sector", "country"]));
    assert_eq!(reader.get("foo"), Some("bar"));
}

#[test]
fn sort_key_round_trip_through_url() {
    for key in Column::ALL {
        let href = format!("/?sort={}", key.as_str());
        let (url, config) = decode(&href);
        assert_eq!(QueryReader::from_url(&url, &config).order_by::<Column>(), *key);
    }
}
