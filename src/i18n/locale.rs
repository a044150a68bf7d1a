//! Supported locales.

use std::fmt;
use std::str::FromStr;

/// A locale the application ships translations for.
///
/// The set is closed: persisted or detected codes that do not map to a member
/// are rejected by [`Locale::from_code`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Locale {
    /// English, the default and fallback locale.
    #[default]
    En,
    /// Hindi.
    Hi,
}

impl Locale {
    /// Every supported locale in rotation order.
    pub const ALL: [Self; 2] = [Self::En, Self::Hi];

    /// Wire code used in storage and translation files.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Hi => "hi",
        }
    }

    /// Human-readable name in the locale's own script.
    #[must_use]
    pub const fn native_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Hi => "हिन्दी",
        }
    }

    /// What: Parse a wire code.
    ///
    /// Inputs:
    /// - `code`: Code such as `"en"` or `"hi"`; surrounding whitespace and case
    ///   are ignored.
    ///
    /// Output:
    /// - `Some(Locale)` for a supported code, `None` otherwise.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|l| l.code().eq_ignore_ascii_case(code))
    }

    /// What: The locale that follows `self` in [`Locale::ALL`], wrapping around.
    ///
    /// Details:
    /// - With two locales this swaps between them, so applying it twice is the
    ///   identity.
    #[must_use]
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|l| *l == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| {
            let known: Vec<&str> = Self::ALL.iter().map(|l| l.code()).collect();
            format!("unsupported locale '{s}' (expected one of: {})", known.join(", "))
        })
    }
}
