//! The cart store.
//!
//! [`CartStore`] owns the authoritative in-memory [`Cart`] and mirrors it to
//! a [`KeyValueStorage`] under a single key. Every mutation runs the full
//! read-modify-write-persist cycle while holding one async mutex, so
//! overlapping calls apply in order and each persisted snapshot includes
//! every mutation before it.
//!
//! Readers never wait on that mutex: the latest cart is published through a
//! `tokio::sync::watch` channel, which also backs [`CartStore::subscribe`].
//!
//! A mutation publishes its cart before writing it, so memory is never behind
//! storage. If the write fails, or the mutation future is dropped while the
//! write is in flight, memory stays ahead until the next mutation rewrites
//! the whole snapshot.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tote_core::{Cart, Decrement, ProductId, ProductRef};
use tracing::instrument;

use crate::error::{Result, StoreError};
use crate::storage::KeyValueStorage;

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "@GoMarketPlace:products";

/// Handle to a loaded cart.
///
/// Cheaply cloneable via `Arc`; all clones share the same cart, storage and
/// mutation queue.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    mutation_lock: Mutex<()>,
    state: watch::Sender<Cart>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.inner.key)
            .field("lines", &self.inner.state.borrow().len())
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Load the cart persisted under `key`.
    ///
    /// A missing snapshot yields an empty cart.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the read fails and
    /// `StoreError::CorruptSnapshot` if the stored text is not a valid cart.
    /// A corrupt snapshot is left in place for inspection.
    #[instrument(skip_all)]
    pub async fn load(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Result<Self> {
        let key = key.into();

        let cart = match storage.get(&key).await? {
            Some(raw) => serde_json::from_str::<Cart>(&raw)
                .map_err(|source| StoreError::CorruptSnapshot {
                    key: key.clone(),
                    source,
                })?,
            None => Cart::new(),
        };

        tracing::info!(
            key = %key,
            lines = cart.len(),
            items = cart.item_count(),
            "Cart loaded"
        );

        let (state, _) = watch::channel(cart);
        Ok(Self {
            inner: Arc::new(CartStoreInner {
                storage,
                key,
                mutation_lock: Mutex::new(()),
                state,
            }),
        })
    }

    /// Load the cart persisted under [`DEFAULT_STORAGE_KEY`].
    ///
    /// # Errors
    ///
    /// See [`CartStore::load`].
    pub async fn load_default(storage: Arc<dyn KeyValueStorage>) -> Result<Self> {
        Self::load(storage, DEFAULT_STORAGE_KEY).await
    }

    /// Storage key this cart is persisted under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.inner.key
    }

    /// Current cart.
    ///
    /// Reflects the latest completed mutation.
    #[must_use]
    pub fn products(&self) -> Cart {
        self.inner.state.borrow().clone()
    }

    /// Total units across all lines of the current cart.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.inner.state.borrow().item_count()
    }

    /// Observe the cart after every completed mutation.
    ///
    /// The receiver starts out holding the current cart, marked as seen.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.inner.state.subscribe()
    }

    /// Add one unit of `product`, appending a new line if needed.
    ///
    /// An existing line keeps its own title, image and price.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add_to_cart(&self, product: ProductRef) -> Cart {
        self.mutate(|cart| {
            let quantity = cart.add(product);
            tracing::debug!(%quantity, "Added to cart");
        })
        .await
    }

    /// Add one unit to the line for `id`. Unknown ids leave the cart as is.
    #[instrument(skip(self))]
    pub async fn increment(&self, id: &ProductId) -> Cart {
        self.mutate(|cart| match cart.increment(id) {
            Some(quantity) => tracing::debug!(%quantity, "Incremented"),
            None => tracing::debug!("Increment for product not in cart"),
        })
        .await
    }

    /// Remove one unit from the line for `id`, dropping the line at zero.
    /// Unknown ids leave the cart as is.
    #[instrument(skip(self))]
    pub async fn decrement(&self, id: &ProductId) -> Cart {
        self.mutate(|cart| match cart.decrement(id) {
            Decrement::Decreased(quantity) => tracing::debug!(%quantity, "Decremented"),
            Decrement::Removed => tracing::debug!("Removed from cart"),
            Decrement::NotFound => tracing::debug!("Decrement for product not in cart"),
        })
        .await
    }

    /// Apply `f` to a copy of the current cart, publish it, then persist it.
    ///
    /// The snapshot is written even when `f` changed nothing.
    async fn mutate<F>(&self, f: F) -> Cart
    where
        F: FnOnce(&mut Cart),
    {
        let _guard = self.inner.mutation_lock.lock().await;

        let mut cart = self.inner.state.borrow().clone();
        f(&mut cart);

        self.inner.state.send_replace(cart.clone());
        self.persist(&cart).await;
        cart
    }

    /// Write `cart` to storage. Failures are logged, not returned.
    async fn persist(&self, cart: &Cart) {
        let raw = match serde_json::to_string(cart) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key = %self.inner.key, "Failed to encode cart snapshot: {e}");
                return;
            }
        };

        if let Err(e) = self.inner.storage.set(&self.inner.key, &raw).await {
            tracing::warn!(key = %self.inner.key, "Failed to persist cart: {e}");
        }
    }
}
