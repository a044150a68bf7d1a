//! The two static theme descriptors.

use ratatui::style::Color;

use super::types::{ColorScheme, Theme};

/// Light palette.
pub static LIGHT_THEME: Theme = Theme {
    is_dark: false,
    background: Color::Rgb(0xf5, 0xf7, 0xfa),
    surface: Color::Rgb(0xff, 0xff, 0xff),
    surface_variant: Color::Rgb(0xeb, 0xef, 0xf5),
    text: Color::Rgb(0x1a, 0x1d, 0x23),
    text_secondary: Color::Rgb(0x5f, 0x67, 0x73),
    border: Color::Rgb(0xd6, 0xdb, 0xe3),
    primary: Color::Rgb(0x1e, 0x66, 0xd9),
    success: Color::Rgb(0x2e, 0x9e, 0x5b),
    warning: Color::Rgb(0xe0, 0x8e, 0x0b),
    danger: Color::Rgb(0xd6, 0x3b, 0x3b),
    info: Color::Rgb(0x0c, 0x8c, 0xc4),
};

/// Dark palette.
pub static DARK_THEME: Theme = Theme {
    is_dark: true,
    background: Color::Rgb(0x12, 0x14, 0x18),
    surface: Color::Rgb(0x1c, 0x1f, 0x26),
    surface_variant: Color::Rgb(0x26, 0x2a, 0x33),
    text: Color::Rgb(0xec, 0xee, 0xf2),
    text_secondary: Color::Rgb(0xa3, 0xaa, 0xb6),
    border: Color::Rgb(0x34, 0x3a, 0x46),
    primary: Color::Rgb(0x5b, 0x9b, 0xff),
    success: Color::Rgb(0x4c, 0xc3, 0x80),
    warning: Color::Rgb(0xf2, 0xb1, 0x3d),
    danger: Color::Rgb(0xf0, 0x6a, 0x6a),
    info: Color::Rgb(0x4f, 0xc1, 0xf0),
};

/// What: Select the static descriptor for a dark flag.
///
/// Output:
/// - `&DARK_THEME` when `is_dark`, `&LIGHT_THEME` otherwise.
#[must_use]
pub fn theme_for(is_dark: bool) -> &'static Theme {
    if is_dark { &DARK_THEME } else { &LIGHT_THEME }
}

/// Descriptor for a color scheme.
#[must_use]
pub fn theme_for_scheme(scheme: ColorScheme) -> &'static Theme {
    theme_for(scheme.is_dark())
}

/// What: Render a color as `#RRGGBB`.
///
/// Details:
/// - Non-RGB colors fall back to their `Debug` name.
#[must_use]
pub fn color_hex(color: Color) -> String {
    match color {
        Color::Rgb(r, g, b) => format!("#{r:02x}{g:02x}{b:02x}"),
        other => format!("{other:?}"),
    }
}
