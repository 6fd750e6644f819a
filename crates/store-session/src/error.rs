//! Cache error types.

use thiserror::Error;

/// Errors that can occur when using the cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Failed to serialize or deserialize a value.
    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// The backing store failed.
    #[error("Store operation failed: {0}")]
    StoreError(String),

    /// A versioned write lost against another writer.
    #[error("Concurrent modification of {key}: expected version {expected}, found {found}")]
    ConcurrentModification {
        key: String,
        expected: u64,
        found: u64,
    },
}
