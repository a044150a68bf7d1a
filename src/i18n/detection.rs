//! System locale detection utilities.

use std::env;

use super::Locale;

/// Environment variables consulted, highest priority first.
const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// What: Detect the platform-reported locale from environment variables.
///
/// Output:
/// - `Some(Locale)` when the first set variable names a supported language,
///   `None` otherwise.
///
/// Details:
/// - Checks `LC_ALL`, `LC_MESSAGES` and `LANG` in order; the first variable
///   that is set and non-empty decides, even if its language is unsupported.
pub fn detect_system_locale() -> Option<Locale> {
    let values = LOCALE_VARS.iter().map(|name| env::var(name).ok());
    let detected = locale_from_env_values(values);
    tracing::debug!(locale = ?detected, "system locale detection");
    detected
}

/// What: Pick a locale from prioritized environment values.
///
/// Inputs:
/// - `values`: Variable values in priority order (`None` when unset).
///
/// Output:
/// - Locale of the first non-empty value, if supported.
fn locale_from_env_values(values: impl IntoIterator<Item = Option<String>>) -> Option<Locale> {
    let first = values
        .into_iter()
        .flatten()
        .find(|v| !v.trim().is_empty())?;
    Locale::from_code(&language_part(&first)?)
}

/// What: Extract the language subtag from a POSIX or BCP 47 locale string.
///
/// Inputs:
/// - `locale_str`: Value like "hi_IN.UTF-8", "en-US", "en_GB@euro".
///
/// Output:
/// - Lowercased language subtag ("hi", "en") or `None` for empty input.
///
/// Details:
/// - Encoding (`.UTF-8`) and modifier (`@euro`) suffixes are stripped.
/// - "C" and "POSIX" map to `None`.
fn language_part(locale_str: &str) -> Option<String> {
    let trimmed = locale_str.trim();
    let without_enc = trimmed.split(['.', '@']).next()?;
    let language = without_enc.split(['_', '-']).next()?.to_lowercase();
    if language.is_empty() || language == "c" || language == "posix" {
        return None;
    }
    Some(language)
}
