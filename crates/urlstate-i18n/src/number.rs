#![forbid(unsafe_code)]

//! Locale-aware numeric text codec.
//!
//! [`NumberCodec`] turns free-form localized numeric text into an `f64` and
//! renders an `f64` back into localized text.
//!
//! # Parsing
//!
//! Parsing is a substitution pipeline followed by a strict ASCII parse:
//!
//! 1. trim surrounding whitespace,
//! 2. drop bidirectional marks (ALM, LRM, RLM),
//! 3. drop grouping separators,
//! 4. rewrite the first decimal separator to `.`,
//! 5. rewrite localized digits to ASCII,
//! 6. rewrite the first localized minus sign to `-`,
//! 7. parse the residue with JavaScript `Number` grammar.
//!
//! Residue that is not a numeral yields `NaN`. Callers must treat `NaN` as
//! "not a number" rather than zero.
//!
//! # Invariants
//!
//! 1. `parse(format(x)) == x` for every finite `x` exactly representable with
//!    at most `maximum_fraction_digits` fraction digits.
//! 2. `parse` never panics, whatever the input.

use serde::Deserialize;

use crate::locale::{self, LocaleSymbols};

/// Locale used when no explicit locale is configured.
pub const DEFAULT_LOCALE: &str = "en-US";

/// Formatting knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NumberFormatOptions {
    /// Upper bound on rendered fraction digits. Trailing zeros are trimmed.
    pub maximum_fraction_digits: u8,
    /// Insert grouping separators every three integer digits.
    pub use_grouping: bool,
}

impl Default for NumberFormatOptions {
    fn default() -> Self {
        Self {
            maximum_fraction_digits: 3,
            use_grouping: true,
        }
    }
}

/// Input accepted by [`NumberCodec::parse_input`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberInput<'a> {
    /// Already numeric, returned unchanged.
    Number(f64),
    /// Localized text to parse.
    Text(&'a str),
    /// Anything else (absent values, non-textual payloads). Parses as `0`.
    Other,
}

impl From<f64> for NumberInput<'_> {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for NumberInput<'_> {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for NumberInput<'_> {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for NumberInput<'_> {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl<'a> From<&'a str> for NumberInput<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<&'a String> for NumberInput<'a> {
    fn from(value: &'a String) -> Self {
        Self::Text(value.as_str())
    }
}

impl<'a> From<Option<&'a str>> for NumberInput<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(Self::Other, Self::Text)
    }
}

/// Locale-aware number parser and formatter.
///
/// Cheap to construct and `Copy`: it only holds a reference into the static
/// symbol table plus the formatting options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberCodec {
    symbols: &'static LocaleSymbols,
    options: NumberFormatOptions,
}

impl NumberCodec {
    /// Codec for `locale` with default formatting options.
    #[must_use]
    pub fn new(locale: &str) -> Self {
        Self::with_options(locale, NumberFormatOptions::default())
    }

    /// Codec for `locale` with explicit formatting options.
    #[must_use]
    pub fn with_options(locale: &str, options: NumberFormatOptions) -> Self {
        Self {
            symbols: locale::resolve(locale),
            options,
        }
    }

    /// The resolved locale symbols.
    #[must_use]
    pub fn symbols(&self) -> &'static LocaleSymbols {
        self.symbols
    }

    /// The formatting options.
    #[must_use]
    pub fn options(&self) -> NumberFormatOptions {
        self.options
    }

    /// Parse loosely typed input.
    ///
    /// Numbers pass through, text is parsed, anything else is `0`.
    pub fn parse_input<'a>(&self, input: impl Into<NumberInput<'a>>) -> f64 {
        match input.into() {
            NumberInput::Number(n) => n,
            NumberInput::Text(text) => self.parse(text),
            NumberInput::Other => 0.0,
        }
    }

    /// Parse localized numeric text. Returns `NaN` for anything that is not
    /// a numeral once localized glyphs are normalized.
    #[must_use]
    pub fn parse(&self, input: &str) -> f64 {
        let symbols = self.symbols;
        let mut ascii = String::with_capacity(input.len());
        let mut decimal_seen = false;
        let mut minus_seen = false;

        for c in input.trim().chars() {
            if locale::is_bidi_mark(c) || symbols.is_group(c) {
                continue;
            }
            if c == symbols.decimal && !decimal_seen {
                decimal_seen = true;
                ascii.push('.');
            } else if let Some(d) = symbols.digit_value(c) {
                ascii.push(char::from(b'0' + d));
            } else if c == symbols.minus && !minus_seen {
                minus_seen = true;
                ascii.push('-');
            } else {
                ascii.push(c);
            }
        }

        parse_numeral(&ascii)
    }

    /// Render `value` with the locale's glyphs.
    #[must_use]
    pub fn format(&self, value: f64) -> String {
        let symbols = self.symbols;
        if value.is_nan() {
            return "NaN".to_string();
        }
        if value.is_infinite() {
            let mut out = String::new();
            if value < 0.0 {
                self.push_minus(&mut out);
            }
            out.push('∞');
            return out;
        }

        let precision = usize::from(self.options.maximum_fraction_digits.min(20));
        let fixed = format!("{:.*}", precision, value.abs());
        let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
        let frac_part = frac_part.trim_end_matches('0');
        let is_zero = frac_part.is_empty() && int_part.bytes().all(|b| b == b'0');

        let mut out = String::with_capacity(fixed.len() + fixed.len() / 3 + 2);
        if value < 0.0 && !is_zero {
            self.push_minus(&mut out);
        }

        let len = int_part.len();
        for (i, b) in int_part.bytes().enumerate() {
            if self.options.use_grouping && i > 0 && (len - i) % 3 == 0 {
                out.push(symbols.group);
            }
            out.push(symbols.digits[usize::from(b - b'0')]);
        }

        if !frac_part.is_empty() {
            out.push(symbols.decimal);
            for b in frac_part.bytes() {
                out.push(symbols.digits[usize::from(b - b'0')]);
            }
        }
        out
    }

    fn push_minus(&self, out: &mut String) {
        if let Some(mark) = self.symbols.bidi_mark {
            out.push(mark);
        }
        out.push(self.symbols.minus);
    }
}

impl Default for NumberCodec {
    fn default() -> Self {
        Self::new(DEFAULT_LOCALE)
    }
}

/// Parse loosely typed input with the default locale.
pub fn to_number<'a>(input: impl Into<NumberInput<'a>>) -> f64 {
    NumberCodec::default().parse_input(input)
}

/// Parse an ASCII numeral with JavaScript `Number` grammar.
///
/// Accepts decimal numerals with optional sign, fraction and exponent,
/// unsigned `0x`/`0o`/`0b` integers, and `Infinity` with optional sign.
/// Everything else, including the empty string, is `NaN`.
#[must_use]
pub fn parse_numeral(text: &str) -> f64 {
    let text = text.trim();
    match text {
        "" => return f64::NAN,
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = text.strip_prefix(prefix) {
            return parse_radix(digits, radix);
        }
    }

    let well_formed = text
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if !well_formed {
        return f64::NAN;
    }
    text.parse::<f64>().unwrap_or(f64::NAN)
}

/// Unsigned digits in `radix`. Values past `u128` keep going in `f64`, so
/// oversized numerals come out large and finite.
fn parse_radix(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    let mut exact: Option<u128> = Some(0);
    let mut approx = 0.0f64;
    for c in digits.chars() {
        let Some(d) = c.to_digit(radix) else {
            return f64::NAN;
        };
        exact = exact
            .and_then(|n| n.checked_mul(u128::from(radix)))
            .and_then(|n| n.checked_add(u128::from(d)));
        approx = approx * f64::from(radix) + f64::from(d);
    }
    exact.map_or(approx, |n| n as f64)
}

/// Render `value` the way a URL carries numbers: shortest round-trip
/// decimal, no grouping, `-0` collapsed to `0`.
#[must_use]
pub fn format_numeral(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value < 0.0 { "-Infinity" } else { "Infinity" }.to_string()
    } else if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}
