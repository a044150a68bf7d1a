//! Library entry for civic-prefs exposing the preference core for the binary
//! and integration tests.

pub mod app;
pub mod args;
pub mod config;
pub mod context;
pub mod error;
pub mod i18n;
pub mod platform;
pub mod prefs;
pub mod storage;
pub mod theme;

pub use context::{MountOptions, PreferenceContext};
