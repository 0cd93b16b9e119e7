#![no_main]

use libfuzzer_sys::fuzz_target;
use urlstate_i18n::{NumberCodec, locale};

fuzz_target!(|data: (u8, &str, i64)| {
    let (index, text, n) = data;
    let all = locale::all();
    let symbols = &all[usize::from(index) % all.len()];
    let codec = NumberCodec::new(symbols.tag);

    let _ = codec.parse(text);

    // Whole numbers up to 10^12 survive a format/parse round trip.
    let x = (n % 1_000_000_000_000) as f64;
    assert_eq!(codec.parse(&codec.format(x)), x);
});
