//! Persistent key-value storage backends.
//!
//! The cart store only needs two operations against its backing storage:
//! read the text stored under a key, and unconditionally replace it. Any
//! backend that can do that implements [`KeyValueStorage`].
//!
//! # Backends
//!
//! - [`MemoryStorage`] - in-process map, for tests and ephemeral sessions
//! - [`FileStorage`] - one file per key under a root directory

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying filesystem or device error.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The key cannot be mapped onto this backend.
    #[error("invalid storage key {key:?}: {reason}")]
    InvalidKey {
        /// The rejected key.
        key: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The backend refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Text key-value storage.
///
/// Implementations must make `set` atomic from the point of view of a later
/// `get`: a reader sees either the previous value or the new one in full.
#[async_trait::async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
