//! In-memory key-value store with failure injection.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use futures::future::{BoxFuture, FutureExt};

use super::KeyValueStore;
use crate::error::StoreError;

/// Volatile store backed by a `HashMap`.
///
/// Reads and writes can be switched to fail, and every successful write is
/// recorded so callers can check what was persisted and in which order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Current key -> value contents.
    values: Mutex<HashMap<String, String>>,
    /// Successful writes in completion order.
    write_log: Mutex<Vec<(String, String)>>,
    /// When set, every `get` fails with `StoreError::Unavailable`.
    fail_reads: AtomicBool,
    /// When set, every `set` fails with `StoreError::Unavailable`.
    fail_writes: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `entries`. Seeding is not logged.
    #[must_use]
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        {
            let mut values = store.values.lock().unwrap_or_else(PoisonError::into_inner);
            for (k, v) in entries {
                values.insert(k.into(), v.into());
            }
        }
        store
    }

    /// Make subsequent reads fail (`true`) or succeed (`false`).
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent writes fail (`true`) or succeed (`false`).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Synchronous peek at the stored value, bypassing failure injection.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// All successful writes so far, oldest first.
    #[must_use]
    pub fn write_log(&self) -> Vec<(String, String)> {
        self.write_log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl KeyValueStore for MemoryStore {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>, StoreError>> {
        async move {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable(format!("read of '{key}' rejected")));
            }
            Ok(self.value(key))
        }
        .boxed()
    }

    fn set<'a>(&'a self, key: &'a str, value: &'a str) -> BoxFuture<'a, Result<(), StoreError>> {
        async move {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable(format!("write of '{key}' rejected")));
            }
            self.values
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(key.to_string(), value.to_string());
            self.write_log
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push((key.to_string(), value.to_string()));
            Ok(())
        }
        .boxed()
    }
}
