//! JSON file backed key-value store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use futures::future::{BoxFuture, FutureExt};
use tokio::sync::Mutex;

use super::KeyValueStore;
use crate::error::StoreError;

/// Store that keeps every key in a single JSON object file.
///
/// The whole file is rewritten on each `set`. Writes go to a sibling temp
/// file first and are renamed into place so a crash never leaves a truncated
/// document behind.
#[derive(Debug)]
pub struct FileStore {
    /// Location of the JSON document.
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Create a store over `path`. The file is created lazily on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing JSON document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// What: Load the full document.
    ///
    /// Output:
    /// - Empty map when the file does not exist or is empty.
    ///
    /// # Errors
    /// - `StoreError::Io` when the file cannot be read.
    /// - `StoreError::Corrupt` when the content is not a JSON object of strings.
    async fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Write the full document through a temp file and rename.
    async fn save(&self, values: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let io_err = |source: std::io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(dir).await.map_err(io_err)?;
        }
        let body = serde_json::to_string_pretty(values).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_err)
    }
}

impl KeyValueStore for FileStore {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>, StoreError>> {
        async move { Ok(self.load().await?.remove(key)) }.boxed()
    }

    fn set<'a>(&'a self, key: &'a str, value: &'a str) -> BoxFuture<'a, Result<(), StoreError>> {
        async move {
            let _guard = self.write_lock.lock().await;
            let mut values = match self.load().await {
                Ok(v) => v,
                Err(StoreError::Corrupt { path, source }) => {
                    // Corrupt content is dropped; the new document holds only this write.
                    tracing::warn!(
                        path = %path.display(),
                        error = %source,
                        "overwriting corrupt preference file"
                    );
                    BTreeMap::new()
                }
                Err(e) => return Err(e),
            };
            values.insert(key.to_string(), value.to_string());
            self.save(&values).await?;
            tracing::debug!(path = %self.path.display(), key, "preference written");
            Ok(())
        }
        .boxed()
    }
}
