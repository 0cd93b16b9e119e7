#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use urlstate_core::{QueryConfig, QueryParams, QueryReader, sort_keys};

sort_keys! {
    enum Sort {
        #[default]
        Name => "name",
        Ebit => "ebit",
    }
}

#[derive(Arbitrary, Debug)]
enum Param {
    Sort(String),
    Order(String),
    Page(String),
    Limit(i64),
    Range { min: Option<f64>, max: Option<f64> },
    Other(String, String),
}

impl Param {
    fn pair(&self) -> (String, String) {
        let side = |v: &Option<f64>| v.map(|n| n.to_string()).unwrap_or_default();
        match self {
            Param::Sort(v) => ("sort".into(), v.clone()),
            Param::Order(v) => ("order".into(), v.clone()),
            Param::Page(v) => ("page".into(), v.clone()),
            Param::Limit(n) => ("limit".into(), n.to_string()),
            Param::Range { min, max } => ("ebit".into(), format!("{},{}", side(min), side(max))),
            Param::Other(k, v) => (k.clone(), v.clone()),
        }
    }
}

fuzz_target!(|input: Vec<Param>| {
    let params: QueryParams = input.iter().take(64).map(Param::pair).collect();
    let config = QueryConfig::default();
    let reader = QueryReader::new(&params, &config);

    match reader.state::<Sort>(&["ebit"]) {
        Ok(state) => {
            assert!(state.page >= 1);
            assert!(state.limit <= config.max_limit);
            assert_eq!(
                state.offset(),
                u64::from(state.page - 1) * u64::from(state.limit)
            );
        }
        Err(err) => assert!(!err.issues().is_empty()),
    }
});
