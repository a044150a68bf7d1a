use std::fs;
use std::path::{Path, PathBuf};

/// Skeleton written when no `settings.conf` exists yet.
pub const SETTINGS_SKELETON_CONTENT: &str = "# civic-prefs settings\n\
#\n\
# Format: key = value\n\
# Lines starting with # are comments.\n\
#\n\
# Where language and theme choices are persisted (JSON document).\n\
# Empty means <config dir>/preferences.json\n\
store_path =\n\
#\n\
# Seed the language from LC_ALL / LC_MESSAGES / LANG when nothing is persisted.\n\
detect_system_locale = false\n\
#\n\
# Follow the terminal's light/dark appearance until a theme is chosen explicitly.\n\
follow_system_theme = true\n\
#\n\
# Log level: trace, debug, info, warn, error (RUST_LOG overrides)\n\
log_level = info\n";

/// User-configurable settings parsed from `settings.conf`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Override for the preference store file; `None` uses the default path.
    pub store_path: Option<PathBuf>,
    /// Seed the initial locale from the environment.
    pub detect_system_locale: bool,
    /// Subscribe the theme store to the platform appearance.
    pub follow_system_theme: bool,
    /// Default tracing filter directive.
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_path: None,
            detect_system_locale: false,
            follow_system_theme: true,
            log_level: "info".to_string(),
        }
    }
}

/// What: Remove inline comments from a configuration value.
///
/// Details:
/// - Strips trailing `//` and `#` sections, then trims.
fn strip_inline_comment(mut s: &str) -> &str {
    if let Some(i) = s.find("//") {
        s = &s[..i];
    }
    if let Some(i) = s.find('#') {
        s = &s[..i];
    }
    s.trim()
}

/// What: Remove an inline comment from a path value.
///
/// Details:
/// - Only a `#` at the start or after whitespace begins a comment; `#` and
///   `//` inside a path are kept.
fn strip_path_comment(s: &str) -> &str {
    let end = s
        .match_indices('#')
        .map(|(i, _)| i)
        .find(|&i| s[..i].is_empty() || s[..i].ends_with(char::is_whitespace))
        .unwrap_or(s.len());
    s[..end].trim()
}

/// Parse a boolean config value.
fn parse_bool(val: &str) -> Option<bool> {
    match val.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// What: Parse settings from `settings.conf` content.
///
/// Inputs:
/// - `content`: File content.
///
/// Output:
/// - `Settings` with every recognized key applied over the defaults.
///
/// Details:
/// - Keys are normalized (`.`, `-`, space -> `_`, lowercase).
/// - Unknown keys and invalid values are logged and leave the default.
#[must_use]
pub fn parse_settings(content: &str) -> Settings {
    let mut settings = Settings::default();
    for (lineno, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//") {
            continue;
        }
        let Some((raw_key, val_raw)) = trimmed.split_once('=') else {
            tracing::warn!(line = lineno + 1, content = trimmed, "ignoring settings line without '='");
            continue;
        };
        let key = raw_key.trim().to_lowercase().replace(['.', '-', ' '], "_");
        let val = strip_inline_comment(val_raw);
        match key.as_str() {
            "store_path" | "store" => {
                let path = strip_path_comment(val_raw);
                settings.store_path = (!path.is_empty()).then(|| PathBuf::from(path));
            }
            "detect_system_locale" | "detect_locale" => match parse_bool(val) {
                Some(b) => settings.detect_system_locale = b,
                None => tracing::warn!(key = %key, value = val, "invalid boolean in settings"),
            },
            "follow_system_theme" | "follow_system_appearance" => match parse_bool(val) {
                Some(b) => settings.follow_system_theme = b,
                None => tracing::warn!(key = %key, value = val, "invalid boolean in settings"),
            },
            "log_level" => {
                if !val.is_empty() {
                    settings.log_level = val.to_string();
                }
            }
            _ => tracing::warn!(key = %key, "unknown settings key"),
        }
    }
    settings
}

/// What: Load settings from `path`, writing the skeleton on first run.
///
/// Inputs:
/// - `path`: Location of `settings.conf`.
///
/// Output:
/// - Parsed settings; defaults when the file cannot be read.
///
/// Details:
/// - A missing or empty file is replaced with [`SETTINGS_SKELETON_CONTENT`];
///   failure to write it is logged and ignored.
pub fn load_settings(path: &Path) -> Settings {
    let meta = fs::metadata(path).ok();
    let empty = meta.as_ref().is_none_or(|m| m.len() == 0);
    if empty {
        if let Some(dir) = path.parent() {
            let _ = fs::create_dir_all(dir);
        }
        match fs::write(path, SETTINGS_SKELETON_CONTENT) {
            Ok(()) => tracing::info!(path = %path.display(), "wrote default settings skeleton"),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "cannot write settings skeleton"),
        }
        return parse_settings(SETTINGS_SKELETON_CONTENT);
    }
    match fs::read_to_string(path) {
        Ok(content) => parse_settings(&content),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot read settings; using defaults");
            Settings::default()
        }
    }
}
