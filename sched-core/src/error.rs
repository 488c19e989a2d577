//! Typed errors for the storage layer.

use std::io;
use thiserror::Error;

/// Failures the store can report to callers.
///
/// "Not found" is never an error here: reads and deletes report absence
/// through their return values so the HTTP layer can keep its in-band
/// error shapes. Only real I/O and JSON failures surface as `StoreError`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying filesystem failure (permissions, disk full, ...).
    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),

    /// A stored document could not be parsed as JSON.
    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    /// A caller-supplied name is unusable (e.g. empty rename target).
    #[error("invalid name: {0}")]
    InvalidName(String),
}
