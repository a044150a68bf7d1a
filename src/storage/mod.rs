//! Device-local key-value storage used to persist preferences.
//!
//! Stores hold plain string values under string keys. The preference stores
//! only ever read one key at startup and overwrite it on each toggle, so the
//! trait exposes nothing beyond `get` and `set`.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use futures::future::BoxFuture;

use crate::error::StoreError;

/// Key under which the selected language code (`"en"` / `"hi"`) is stored.
pub const LANGUAGE_KEY: &str = "user-language";
/// Key under which the selected theme (`"dark"` / `"light"`) is stored.
pub const THEME_KEY: &str = "user-theme";

/// What: Asynchronous string key-value store.
///
/// Details:
/// - `get` returns `Ok(None)` for absent keys; errors mean the store itself
///   could not be read.
/// - `set` overwrites; each value is complete, so concurrent writers resolve
///   as last write wins.
/// - Futures are boxed so the trait stays object safe behind `Arc<dyn _>`.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>, StoreError>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set<'a>(&'a self, key: &'a str, value: &'a str) -> BoxFuture<'a, Result<(), StoreError>>;
}
