//! Configuration: directory layout and `settings.conf`.

/// Path resolution for config directories.
mod paths;
/// `settings.conf` parsing and first-run skeleton.
mod settings;

pub use paths::{config_dir, default_store_path, logs_dir, settings_path};
pub use settings::{SETTINGS_SKELETON_CONTENT, Settings, load_settings, parse_settings};
