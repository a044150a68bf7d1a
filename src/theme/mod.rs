//! Theme system.
//!
//! Two static palettes ([`LIGHT_THEME`], [`DARK_THEME`]) and the
//! [`ColorScheme`] that selects between them. Runtime selection lives in
//! [`crate::prefs::ThemeStore`].

/// Static light and dark descriptors.
mod palette;
/// Theme type definitions.
mod types;

pub use palette::{DARK_THEME, LIGHT_THEME, color_hex, theme_for, theme_for_scheme};
pub use types::{ColorScheme, Theme};
