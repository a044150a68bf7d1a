use std::env;
use std::path::{Path, PathBuf};

/// Directory name under the config base.
const APP_DIR: &str = "civic-prefs";

/// What: Resolve the configuration directory from explicit environment values.
///
/// Inputs:
/// - `xdg_config`: Value of `XDG_CONFIG_HOME`, if set.
/// - `home`: Value of `HOME`, if set.
///
/// Output:
/// - `$XDG_CONFIG_HOME/civic-prefs`, else `$HOME/.config/civic-prefs`, else
///   `None`.
///
/// Details:
/// - Empty or whitespace-only values count as unset.
fn resolve_config_dir(xdg_config: Option<&str>, home: Option<&str>) -> Option<PathBuf> {
    if let Some(xdg) = xdg_config
        && !xdg.trim().is_empty()
    {
        return Some(Path::new(xdg).join(APP_DIR));
    }
    home.filter(|h| !h.trim().is_empty())
        .map(|h| Path::new(h).join(".config").join(APP_DIR))
}

/// Configuration directory (not created).
///
/// Falls back to `./.civic-prefs` when neither `XDG_CONFIG_HOME` nor `HOME`
/// is available.
#[must_use]
pub fn config_dir() -> PathBuf {
    let xdg = env::var("XDG_CONFIG_HOME").ok();
    let home = env::var("HOME").ok();
    resolve_config_dir(xdg.as_deref(), home.as_deref())
        .unwrap_or_else(|| PathBuf::from(format!(".{APP_DIR}")))
}

/// Logs directory under config: `<config_dir>/logs` (not created).
#[must_use]
pub fn logs_dir() -> PathBuf {
    config_dir().join("logs")
}

/// Path of `settings.conf` inside the config directory.
#[must_use]
pub fn settings_path() -> PathBuf {
    config_dir().join("settings.conf")
}

/// Default location of the preference store document.
#[must_use]
pub fn default_store_path() -> PathBuf {
    config_dir().join("preferences.json")
}
