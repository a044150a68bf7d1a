//! Internationalization (i18n) module.
//!
//! This module provides the supported locale set, the static translation
//! table and locale detection.
//!
//! # Overview
//!
//! - **Locales**: closed set [`Locale`] (`en`, `hi`), `en` being the default.
//! - **Translation table**: `config/translations.yml`, embedded at compile
//!   time and parsed once into [`TranslationTable::builtin`].
//! - **Fallback chain**: active locale -> default locale -> raw key.
//! - **Detection**: [`detect_system_locale`] reads `LC_ALL`, `LC_MESSAGES`,
//!   `LANG`.
//!
//! # Translation file
//!
//! ```yaml
//! login:
//!   en: "Login"
//!   hi: "लॉगिन"
//! ```
//!
//! # Error Handling
//!
//! - Missing keys return the key itself and log debug messages
//! - Unsupported locale codes in the table are skipped with a warning
//! - Nothing here panics or returns an error to views

mod detection;
mod locale;
pub mod translations;

pub use detection::detect_system_locale;
pub use locale::Locale;
pub use translations::{TranslationEntry, TranslationTable, format_placeholders};
