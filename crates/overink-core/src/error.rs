//! Error types for the persistence layer.

use thiserror::Error;

/// Errors from stroke serialization and the keyed page store.
///
/// The engine catches and logs these at its boundary; they never propagate
/// out of the annotation layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage backend error: {0}")]
    Backend(String),
}
