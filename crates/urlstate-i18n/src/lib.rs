#![forbid(unsafe_code)]

//! Locale-aware number handling: a parse/format codec driven by a built-in
//! symbol table, and compact (`1.2M`, `3.4 BSEK`) rendering on top of it.

pub mod compact;
pub mod error;
pub mod locale;
pub mod number;

pub use compact::{
    CompactOptions, MAX_SIGNIFICANT_DIGITS, NumberStyle, cap_significant, format_compact,
};
pub use error::{I18nError, Result};
pub use locale::LocaleSymbols;
pub use number::{
    DEFAULT_LOCALE, NumberCodec, NumberFormatOptions, NumberInput, format_numeral, parse_numeral,
    to_number,
};
