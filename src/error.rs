//! Error types for storage and binary setup.
//!
//! Preference stores never surface these to their callers: persistence
//! failures are logged and the in-memory value stays authoritative. The types
//! exist so storage backends and the binary can report what went wrong.

use std::path::PathBuf;

/// Failure of a key-value store operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("store I/O failed at {path}: {source}")]
    Io {
        /// File the store was operating on.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The backing file exists but does not hold a JSON object of strings.
    #[error("store file {path} is corrupt: {source}")]
    Corrupt {
        /// File that failed to parse.
        path: PathBuf,
        /// Parse error reported by `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// The store refused the operation (e.g. storage quota, injected failure).
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// The background writer stopped before the write completed.
    #[error("preference writer closed before the write completed")]
    Closed,
}

/// Failure while setting up the command-line front end.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The configuration or log directory could not be created.
    #[error("cannot prepare directory {path}: {source}")]
    Directory {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A store operation the command required failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
