//! Integration tests for Tote.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tote-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_store` - Store operations persisted through the file backend
//! - `cart_provider` - Provider scope and fail-fast lookup
//!
//! This library only holds shared fixtures.

use std::sync::Arc;

use tempfile::TempDir;
use tote_core::{Price, ProductId, ProductRef};
use tote_store::{CartStore, FileStorage, StoreError};

/// A cart store backed by files in a temporary directory.
///
/// The directory lives as long as this value.
pub struct TestCart {
    pub dir: TempDir,
    pub store: CartStore,
}

impl TestCart {
    /// Open a store over a fresh temporary directory.
    ///
    /// # Panics
    ///
    /// Panics if the directory or storage cannot be created.
    #[allow(clippy::expect_used)]
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = open_store(&dir).await.expect("open cart store");
        Self { dir, store }
    }

    /// Load a second, independent store over the same directory.
    ///
    /// # Errors
    ///
    /// Returns the store error if the persisted snapshot cannot be loaded.
    pub async fn reopen(&self) -> Result<CartStore, StoreError> {
        open_store(&self.dir).await
    }
}

/// Load the default-key cart stored in `dir`.
///
/// # Errors
///
/// Returns the store error if storage cannot be opened or the snapshot is
/// corrupt.
pub async fn open_store(dir: &TempDir) -> Result<CartStore, StoreError> {
    let storage = FileStorage::open(dir.path()).await?;
    CartStore::load_default(Arc::new(storage)).await
}

/// Build a product reference.
///
/// # Panics
///
/// Panics if `id` is not a valid product id.
#[allow(clippy::expect_used)]
#[must_use]
pub fn product(id: &str, title: &str, price: i64) -> ProductRef {
    ProductRef {
        id: pid(id),
        title: title.to_string(),
        image_url: format!("https://img.example/{id}.png"),
        price: Price::from_units(price),
    }
}

/// Parse a product id.
///
/// # Panics
///
/// Panics if `id` is empty.
#[allow(clippy::expect_used)]
#[must_use]
pub fn pid(id: &str) -> ProductId {
    ProductId::parse(id).expect("valid product id")
}
