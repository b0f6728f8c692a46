//! Error types for the cart store.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors that stop a cart store from being constructed.
///
/// Once a store is loaded its mutations never fail: persistence errors are
/// logged and the in-memory cart stays authoritative.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading the persisted snapshot failed.
    #[error("failed to read cart snapshot: {0}")]
    Storage(#[from] StorageError),

    /// A snapshot exists but is not a valid cart.
    #[error("cart snapshot under {key:?} is corrupt: {source}")]
    CorruptSnapshot {
        /// Storage key holding the snapshot.
        key: String,
        /// Decode failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised when resolving the cart from the provider context.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    /// No provider scope is active on the current task.
    #[error("use_cart must be used within a CartProvider")]
    OutsideProvider,
}

/// Result type alias for `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;
