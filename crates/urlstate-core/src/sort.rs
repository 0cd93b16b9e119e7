#![forbid(unsafe_code)]

//! Sort direction and the sort-key enumeration contract.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

impl Order {
    /// Accepts exactly `asc` or `desc`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A closed set of sortable columns with a declared default.
///
/// Use [`sort_keys!`](crate::sort_keys) to declare one.
pub trait SortKey: Copy + Eq + fmt::Debug + 'static {
    /// Every permitted key.
    const ALL: &'static [Self];
    /// Key used when the URL carries none.
    const DEFAULT: Self;

    /// Wire name of the key.
    fn as_str(&self) -> &'static str;

    /// Look a wire name up in [`ALL`](Self::ALL).
    fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == value)
    }
}

/// Declare a [`SortKey`] enum. The `#[default]` variant comes first.
///
/// ```
/// urlstate_core::sort_keys! {
///     pub enum CompanySort {
///         #[default]
///         Name => "name",
///         Revenue => "revenue",
///     }
/// }
///
/// use urlstate_core::SortKey;
/// assert_eq!(CompanySort::parse("revenue"), Some(CompanySort::Revenue));
/// assert_eq!(CompanySort::DEFAULT.as_str(), "name");
/// ```
#[macro_export]
macro_rules! sort_keys {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            #[default]
            $default:ident => $default_str:literal
            $(, $variant:ident => $variant_str:literal)* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $default,
            $($variant,)*
        }

        impl $crate::SortKey for $name {
            const ALL: &'static [Self] = &[Self::$default, $(Self::$variant,)*];
            const DEFAULT: Self = Self::$default;

            fn as_str(&self) -> &'static str {
                match self {
                    Self::$default => $default_str,
                    $(Self::$variant => $variant_str,)*
                }
            }
        }
    };
}
