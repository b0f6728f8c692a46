//! Tote Store - Cart state container with local persistence.
//!
//! This crate holds the shopping cart in memory, mirrors it to a key-value
//! storage backend after every change, and hands it to the rest of the
//! application through an explicit handle.
//!
//! # Architecture
//!
//! - [`CartStore`] - the cart handle: read access, change subscription and
//!   the three mutations (`add_to_cart`, `increment`, `decrement`)
//! - [`storage`] - the [`KeyValueStorage`] contract and its backends
//! - [`context`] - provider scope with fail-fast [`use_cart`] lookup
//!
//! Mutations are serialized by the store, so concurrent callers cannot
//! overwrite each other's persisted snapshot.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod context;
pub mod error;
pub mod storage;
pub mod store;

pub use context::{CartProvider, use_cart};
pub use error::{ContextError, StoreError};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use store::{CartStore, DEFAULT_STORAGE_KEY};
