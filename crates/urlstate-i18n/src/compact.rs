#![forbid(unsafe_code)]

//! Compact number rendering for table cells.
//!
//! Values are first capped to a number of significant digits, then scaled by
//! the largest suffix (`T`, `B`, `M`, `K`) whose threshold the magnitude
//! reaches, and finally rendered with at most two fraction digits.
//!
//! | value           | style            | output        |
//! |-----------------|------------------|---------------|
//! | `1_234_567.0`   | `Decimal`        | `1.23M`       |
//! | `0.1234`        | `Percent`        | `12.3%`       |
//! | `5e9`           | `Currency("SEK")`| `5 BSEK`      |

use serde::Deserialize;

use crate::error::{I18nError, Result};
use crate::number::{DEFAULT_LOCALE, NumberCodec, NumberFormatOptions};

const SUFFIXES: [(&str, f64); 4] = [
    ("T", 1_000_000_000_000.0),
    ("B", 1_000_000_000.0),
    ("M", 1_000_000.0),
    ("K", 1_000.0),
];

/// How a compact number is decorated.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberStyle {
    #[default]
    Decimal,
    Percent,
    /// ISO currency code appended after the suffix.
    Currency(String),
}

/// Options for [`format_compact`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompactOptions {
    pub style: NumberStyle,
    /// Significant digits kept before scaling.
    pub digits: u32,
    pub locale: String,
}

impl Default for CompactOptions {
    fn default() -> Self {
        Self {
            style: NumberStyle::Decimal,
            digits: 3,
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

impl CompactOptions {
    #[must_use]
    pub fn decimal() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn percent() -> Self {
        Self {
            style: NumberStyle::Percent,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn currency(code: impl Into<String>) -> Self {
        Self {
            style: NumberStyle::Currency(code.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_digits(mut self, digits: u32) -> Self {
        self.digits = digits;
        self
    }
}

/// Most significant decimal digits an `f64` carries.
pub const MAX_SIGNIFICANT_DIGITS: u32 = 17;

/// Keep `digits` significant digits of `value`, clamped to
/// `1..=MAX_SIGNIFICANT_DIGITS`.
///
/// Numbers whose integer part fits in `digits` are rounded; longer numbers
/// are truncated toward zero.
#[must_use]
pub fn cap_significant(value: f64, digits: u32) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let digits = digits.clamp(1, MAX_SIGNIFICANT_DIGITS);
    let sign = value.signum();
    let abs = value.abs();
    let len = abs.log10().floor() as i32 + 1;

    if len <= digits as i32 {
        let rounded = format!("{:.*e}", (digits - 1) as usize, abs)
            .parse::<f64>()
            .unwrap_or(abs);
        return sign * rounded;
    }

    let factor = 10f64.powi(len - digits as i32);
    sign * (abs / factor).floor() * factor
}

/// Render `value` compactly.
pub fn format_compact(value: f64, options: &CompactOptions) -> Result<String> {
    let codec = NumberCodec::with_options(
        &options.locale,
        NumberFormatOptions {
            maximum_fraction_digits: 2,
            use_grouping: true,
        },
    );

    let magnitude = value.abs();
    let mut number = cap_significant(value, options.digits);
    let mut suffix = "";
    for (label, threshold) in SUFFIXES {
        if magnitude >= threshold {
            number /= threshold;
            suffix = label;
            break;
        }
    }

    match &options.style {
        NumberStyle::Currency(code) if code.is_empty() => Err(I18nError::MissingCurrency),
        NumberStyle::Currency(code) => Ok(format!("{} {suffix}{code}", codec.format(number))),
        NumberStyle::Percent => Ok(format!("{}%{suffix}", codec.format(number * 100.0))),
        NumberStyle::Decimal => Ok(format!("{}{suffix}", codec.format(number))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cap_rounds_short_numbers() {
        assert_eq!(cap_significant(12.3456, 3), 12.3);
        assert_eq!(cap_significant(-0.98765, 2), -0.99);
    }

    #[test]
    fn cap_truncates_long_numbers() {
        assert_eq!(cap_significant(1_234_567.0, 3), 1_230_000.0);
        assert_eq!(cap_significant(-1_599.0, 3), -1_590.0);
    }

    #[test]
    fn cap_keeps_zero_and_non_finite() {
        assert_eq!(cap_significant(0.0, 3), 0.0);
        assert!(cap_significant(f64::NAN, 3).is_nan());
    }

    #[test]
    fn cap_clamps_digit_count() {
        assert_eq!(cap_significant(1234.5678, u32::MAX), 1234.5678);
        assert_eq!(cap_significant(1234.5678, 0), 1000.0);
        let opts = CompactOptions {
            digits: 4_000_000_000,
            ..CompactOptions::decimal()
        };
        assert_eq!(format_compact(1_234_567.0, &opts).unwrap(), "1.23M");
    }

    #[test]
    fn decimal_with_suffix() {
        assert_eq!(
            format_compact(1_234_567.0, &CompactOptions::decimal()).unwrap(),
            "1.23M"
        );
        assert_eq!(
            format_compact(-1_500.0, &CompactOptions::decimal()).unwrap(),
            "-1.5K"
        );
        assert_eq!(format_compact(999.0, &CompactOptions::decimal()).unwrap(), "999");
    }

    #[test]
    fn percent() {
        assert_eq!(
            format_compact(0.1234, &CompactOptions::percent()).unwrap(),
            "12.3%"
        );
    }

    #[test]
    fn currency() {
        assert_eq!(
            format_compact(5_000_000_000.0, &CompactOptions::currency("SEK")).unwrap(),
            "5 BSEK"
        );
        assert_eq!(
            format_compact(42.0, &CompactOptions::currency("EUR")).unwrap(),
            "42 EUR"
        );
    }

    #[test]
    fn currency_requires_code() {
        assert_eq!(
            format_compact(1.0, &CompactOptions::currency("")),
            Err(I18nError::MissingCurrency)
        );
    }

    #[test]
    fn localized_compact() {
        let opts = CompactOptions {
            locale: "sv".to_string(),
            ..CompactOptions::decimal()
        };
        assert_eq!(format_compact(1_234_567.0, &opts).unwrap(), "1,23M");
    }
}
