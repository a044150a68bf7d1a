//! Translation table and lookup utilities.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::Locale;

/// Per-locale strings for one key.
pub type TranslationEntry = HashMap<Locale, String>;

/// Built-in table source, embedded at compile time.
const BUILTIN_TRANSLATIONS: &str = include_str!("../../config/translations.yml");

/// Parsed built-in table, initialized on first use.
static BUILTIN: OnceLock<TranslationTable> = OnceLock::new();

/// Immutable mapping from semantic key to per-locale strings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TranslationTable {
    /// Key -> locale -> string.
    entries: HashMap<String, TranslationEntry>,
}

impl TranslationTable {
    /// What: The table shipped with the application.
    ///
    /// Output:
    /// - Process-wide static table parsed from `config/translations.yml`.
    ///
    /// Details:
    /// - Parsing happens once; a malformed document is logged and yields an
    ///   empty table, so every lookup degrades to the raw key.
    pub fn builtin() -> &'static Self {
        BUILTIN.get_or_init(|| match Self::from_yaml_str(BUILTIN_TRANSLATIONS) {
            Ok(table) => {
                tracing::debug!(keys = table.len(), "loaded built-in translations");
                table
            }
            Err(e) => {
                tracing::error!(error = %e, "built-in translations failed to parse");
                Self::default()
            }
        })
    }

    /// What: Parse a YAML document of `key: { locale: string }` mappings.
    ///
    /// Inputs:
    /// - `contents`: YAML text.
    ///
    /// Output:
    /// - Parsed table.
    ///
    /// # Errors
    /// - Returns the `serde_norway` error when the document is not a mapping of
    ///   mappings of strings.
    ///
    /// Details:
    /// - Locale codes that are not supported are skipped with a warning.
    pub fn from_yaml_str(contents: &str) -> Result<Self, serde_norway::Error> {
        let raw: HashMap<String, HashMap<String, String>> = serde_norway::from_str(contents)?;
        let mut entries = HashMap::with_capacity(raw.len());
        for (key, by_code) in raw {
            let mut entry = TranslationEntry::with_capacity(by_code.len());
            for (code, text) in by_code {
                if let Some(locale) = Locale::from_code(&code) {
                    entry.insert(locale, text);
                } else {
                    tracing::warn!(key = %key, code = %code, "skipping unsupported locale in translations");
                }
            }
            entries.insert(key, entry);
        }
        Ok(Self { entries })
    }

    /// Build a table from `(key, locale, text)` triples.
    pub fn from_triples<'a>(triples: impl IntoIterator<Item = (&'a str, Locale, &'a str)>) -> Self {
        let mut entries: HashMap<String, TranslationEntry> = HashMap::new();
        for (key, locale, text) in triples {
            entries
                .entry(key.to_string())
                .or_default()
                .insert(locale, text.to_string());
        }
        Self { entries }
    }

    /// Number of keys in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sorted list of every key.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Exact entry for `key` under `locale`, without fallback.
    #[must_use]
    pub fn get(&self, key: &str, locale: Locale) -> Option<&str> {
        self.entries.get(key)?.get(&locale).map(String::as_str)
    }

    /// Keys lacking an entry for `locale`, sorted.
    #[must_use]
    pub fn missing_for(&self, locale: Locale) -> Vec<&str> {
        let mut missing: Vec<&str> = self
            .entries
            .iter()
            .filter(|(_, entry)| !entry.contains_key(&locale))
            .map(|(k, _)| k.as_str())
            .collect();
        missing.sort_unstable();
        missing
    }

    /// What: Resolve `key` for `locale` with fallback.
    ///
    /// Inputs:
    /// - `key`: Semantic key (e.g. "login").
    /// - `locale`: Active locale.
    ///
    /// Output:
    /// - The `locale` entry, else the default locale's entry, else `key` itself.
    ///
    /// Details:
    /// - Never fails; misses are logged at debug level so a missing
    ///   localization never breaks a view.
    #[must_use]
    pub fn resolve(&self, key: &str, locale: Locale) -> String {
        let Some(entry) = self.entries.get(key) else {
            tracing::debug!(
                "Missing translation key: '{}'. Returning key as-is. Please add this key to translations.yml.",
                key
            );
            return key.to_string();
        };
        if let Some(text) = entry.get(&locale) {
            return text.clone();
        }
        if let Some(text) = entry.get(&Locale::default()) {
            tracing::debug!(
                "Translation key '{}' not found for locale '{}', using fallback",
                key,
                locale
            );
            return text.clone();
        }
        tracing::debug!(
            "Translation key '{}' has no '{}' or default entry. Returning key as-is.",
            key,
            locale
        );
        key.to_string()
    }
}

/// What: Replace `{}` placeholders in order.
///
/// Inputs:
/// - `template`: Text containing zero or more `{}` placeholders.
/// - `args`: Values substituted left to right.
///
/// Output:
/// - Formatted string; surplus args are ignored, surplus placeholders remain.
pub fn format_placeholders(template: &str, args: &[&dyn std::fmt::Display]) -> String {
    let mut result = template.to_string();
    for arg in args {
        result = result.replacen("{}", &arg.to_string(), 1);
    }
    result
}
