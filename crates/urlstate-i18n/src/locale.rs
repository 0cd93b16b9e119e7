#![forbid(unsafe_code)]

//! Built-in number symbol table.
//!
//! Each entry records the glyphs a locale uses when rendering numbers: the
//! grouping separator, the decimal separator, the minus sign (optionally
//! preceded by a bidirectional mark) and the ten digit glyphs.
//!
//! Lookup resolves a BCP-47 tag by exact match first, then by its primary
//! language subtag, and finally falls back to `en`.

/// ASCII digits.
const LATN: [char; 10] = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9'];

/// Arabic-Indic digits.
const ARAB: [char; 10] = [
    '\u{0660}', '\u{0661}', '\u{0662}', '\u{0663}', '\u{0664}', '\u{0665}', '\u{0666}', '\u{0667}',
    '\u{0668}', '\u{0669}',
];

/// Extended Arabic-Indic digits (Persian).
const ARABEXT: [char; 10] = [
    '\u{06F0}', '\u{06F1}', '\u{06F2}', '\u{06F3}', '\u{06F4}', '\u{06F5}', '\u{06F6}', '\u{06F7}',
    '\u{06F8}', '\u{06F9}',
];

const NBSP: char = '\u{00A0}';
const NARROW_NBSP: char = '\u{202F}';
const MINUS_SIGN: char = '\u{2212}';
const ARABIC_GROUP: char = '\u{066C}';
const ARABIC_DECIMAL: char = '\u{066B}';

/// Arabic letter mark.
pub const ALM: char = '\u{061C}';
/// Left-to-right mark.
pub const LRM: char = '\u{200E}';
/// Right-to-left mark.
pub const RLM: char = '\u{200F}';

/// Number rendering symbols for one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleSymbols {
    /// Canonical tag this entry is registered under.
    pub tag: &'static str,
    /// Grouping (thousands) separator.
    pub group: char,
    /// Decimal separator.
    pub decimal: char,
    /// Minus sign glyph.
    pub minus: char,
    /// Bidirectional mark emitted before the minus sign, if any.
    pub bidi_mark: Option<char>,
    /// Digit glyphs for 0 through 9.
    pub digits: [char; 10],
}

impl LocaleSymbols {
    /// Map a localized digit glyph back to its numeric value.
    #[must_use]
    pub fn digit_value(&self, c: char) -> Option<u8> {
        self.digits
            .iter()
            .position(|&d| d == c)
            .map(|i| i as u8)
    }

    /// Whether `c` acts as a grouping separator in this locale.
    ///
    /// Locales that group with a non-breaking space also accept the plain and
    /// narrow variants, since typed input rarely contains the exact glyph.
    #[must_use]
    pub fn is_group(&self, c: char) -> bool {
        if c == self.group {
            return true;
        }
        matches!(self.group, NBSP | NARROW_NBSP) && matches!(c, ' ' | NBSP | NARROW_NBSP)
    }
}

const fn entry(tag: &'static str, group: char, decimal: char, minus: char) -> LocaleSymbols {
    LocaleSymbols {
        tag,
        group,
        decimal,
        minus,
        bidi_mark: None,
        digits: LATN,
    }
}

static TABLE: [LocaleSymbols; 13] = [
    entry("en", ',', '.', '-'),
    entry("sv", NBSP, ',', MINUS_SIGN),
    entry("fi", NBSP, ',', MINUS_SIGN),
    entry("nb", NBSP, ',', MINUS_SIGN),
    entry("no", NBSP, ',', MINUS_SIGN),
    entry("da", '.', ',', '-'),
    entry("is", '.', ',', '-'),
    entry("de", '.', ',', '-'),
    entry("de-CH", '\u{2019}', '.', '-'),
    entry("fr", NARROW_NBSP, ',', '-'),
    entry("ja", ',', '.', '-'),
    LocaleSymbols {
        tag: "ar",
        group: ARABIC_GROUP,
        decimal: ARABIC_DECIMAL,
        minus: '-',
        bidi_mark: Some(ALM),
        digits: ARAB,
    },
    LocaleSymbols {
        tag: "fa",
        group: ARABIC_GROUP,
        decimal: ARABIC_DECIMAL,
        minus: MINUS_SIGN,
        bidi_mark: Some(LRM),
        digits: ARABEXT,
    },
];

/// All registered locale entries.
#[must_use]
pub fn all() -> &'static [LocaleSymbols] {
    &TABLE
}

/// Resolve a locale tag (`en-US`, `sv_SE`, `de-CH`, ...) to its symbols.
#[must_use]
pub fn resolve(tag: &str) -> &'static LocaleSymbols {
    let normalized = tag.trim().replace('_', "-");
    if let Some(exact) = TABLE.iter().find(|s| s.tag.eq_ignore_ascii_case(&normalized)) {
        return exact;
    }
    let language = normalized.split('-').next().unwrap_or_default();
    TABLE
        .iter()
        .find(|s| s.tag.eq_ignore_ascii_case(language))
        .unwrap_or(&TABLE[0])
}

/// Whether `c` is a bidirectional control mark stripped before parsing.
#[inline]
#[must_use]
pub fn is_bidi_mark(c: char) -> bool {
    matches!(c, ALM | LRM | RLM)
}
