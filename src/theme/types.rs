use std::fmt;
use std::str::FromStr;

use ratatui::style::Color;

/// Application theme palette used by rendering code.
///
/// All colors are provided as [`ratatui::style::Color`] and are suitable for
/// direct use with widgets and styles. Only the two static instances in
/// [`super::palette`] exist; the `is_dark` flag identifies which one this is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    /// Whether this is the dark palette.
    pub is_dark: bool,
    /// Canvas background behind every screen.
    pub background: Color,
    /// Card and panel background.
    pub surface: Color,
    /// Alternate surface for inputs and nested panels.
    pub surface_variant: Color,
    /// Primary foreground text color.
    pub text: Color,
    /// Secondary text for captions and low-emphasis content.
    pub text_secondary: Color,
    /// Divider and outline color.
    pub border: Color,
    /// Brand accent for buttons, links and selection.
    pub primary: Color,
    /// Success/resolved state color.
    pub success: Color,
    /// Warning/pending state color.
    pub warning: Color,
    /// Error/rejected state color.
    pub danger: Color,
    /// Informational/in-progress state color.
    pub info: Color,
}

impl Theme {
    /// Color scheme this palette belongs to.
    #[must_use]
    pub const fn scheme(&self) -> ColorScheme {
        ColorScheme::from_is_dark(self.is_dark)
    }

    /// Every color token with its name, in declaration order.
    #[must_use]
    pub const fn tokens(&self) -> [(&'static str, Color); 11] {
        [
            ("background", self.background),
            ("surface", self.surface),
            ("surface_variant", self.surface_variant),
            ("text", self.text),
            ("text_secondary", self.text_secondary),
            ("border", self.border),
            ("primary", self.primary),
            ("success", self.success),
            ("warning", self.warning),
            ("danger", self.danger),
            ("info", self.info),
        ]
    }
}

/// Light or dark appearance, as stored under the theme key and as reported
/// by the platform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorScheme {
    /// Light appearance, the default.
    #[default]
    Light,
    /// Dark appearance.
    Dark,
}

impl ColorScheme {
    /// Scheme for a dark flag.
    #[must_use]
    pub const fn from_is_dark(is_dark: bool) -> Self {
        if is_dark { Self::Dark } else { Self::Light }
    }

    /// Whether this is the dark scheme.
    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    /// Persisted value (`"dark"` / `"light"`).
    #[must_use]
    pub const fn as_config_key(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parse a persisted value; case and surrounding whitespace are ignored.
    #[must_use]
    pub fn from_config_key(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_config_key())
    }
}

impl FromStr for ColorScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_config_key(s)
            .ok_or_else(|| format!("unsupported theme '{s}' (expected 'dark' or 'light')"))
    }
}
