//! Provider scope for resolving the cart without threading it through
//! every call.
//!
//! Code that runs inside [`CartProvider::scope`] can call [`use_cart`] to get
//! the [`CartStore`]. Outside a scope `use_cart` fails immediately with
//! [`ContextError::OutsideProvider`] rather than handing out a default cart.
//!
//! The scope is task-local: it covers the future passed to `scope` but not
//! tasks spawned from it. Pass a cloned `CartStore` into spawned tasks
//! explicitly.
//!
//! ```
//! # use std::sync::Arc;
//! # use tote_store::{CartProvider, CartStore, MemoryStorage, use_cart};
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = CartStore::load_default(Arc::new(MemoryStorage::new())).await?;
//!
//! let count = CartProvider::scope(store, async {
//!     use_cart().map(|cart| cart.item_count())
//! })
//! .await?;
//! assert_eq!(count, 0);
//!
//! assert!(use_cart().is_err());
//! # Ok(())
//! # }
//! ```

use std::future::Future;

use crate::error::ContextError;
use crate::store::CartStore;

tokio::task_local! {
    static CURRENT_CART: CartStore;
}

/// Installs a [`CartStore`] for the duration of a future or closure.
#[derive(Debug, Clone, Copy)]
pub struct CartProvider;

impl CartProvider {
    /// Run `f` with `store` resolvable through [`use_cart`].
    pub async fn scope<F>(store: CartStore, f: F) -> F::Output
    where
        F: Future,
    {
        CURRENT_CART.scope(store, f).await
    }

    /// Synchronous counterpart of [`CartProvider::scope`].
    pub fn sync_scope<F, R>(store: CartStore, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        CURRENT_CART.sync_scope(store, f)
    }
}

/// Resolve the cart installed by the enclosing [`CartProvider`].
///
/// # Errors
///
/// Returns `ContextError::OutsideProvider` when no provider scope is active.
pub fn use_cart() -> Result<CartStore, ContextError> {
    CURRENT_CART
        .try_with(CartStore::clone)
        .map_err(|_| ContextError::OutsideProvider)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tote_core::{Price, ProductId, ProductRef};

    use super::*;
    use crate::storage::MemoryStorage;

    async fn empty_store() -> CartStore {
        CartStore::load_default(Arc::new(MemoryStorage::new()))
            .await
            .unwrap()
    }

    #[test]
    fn test_use_cart_outside_provider_fails() {
        let err = use_cart().unwrap_err();
        assert_eq!(err, ContextError::OutsideProvider);
        assert_eq!(
            err.to_string(),
            "use_cart must be used within a CartProvider"
        );
    }

    #[tokio::test]
    async fn test_use_cart_inside_scope_mutates_shared_store() {
        let store = empty_store().await;

        CartProvider::scope(store.clone(), async {
            let cart = use_cart().unwrap();
            cart.add_to_cart(ProductRef {
                id: ProductId::parse("1").unwrap(),
                title: "Shoe".to_string(),
                image_url: "u".to_string(),
                price: Price::from_units(100),
            })
            .await;
        })
        .await;

        assert_eq!(store.item_count(), 1);
    }

    #[tokio::test]
    async fn test_scope_ends_with_future() {
        let store = empty_store().await;
        CartProvider::scope(store, async {
            assert!(use_cart().is_ok());
        })
        .await;
        assert!(use_cart().is_err());
    }

    #[tokio::test]
    async fn test_spawned_task_is_outside_scope() {
        let store = empty_store().await;
        let result = CartProvider::scope(store, async {
            tokio::spawn(async { use_cart().map(|_| ()) }).await.unwrap()
        })
        .await;
        assert_eq!(result, Err(ContextError::OutsideProvider));
    }

    #[tokio::test]
    async fn test_sync_scope() {
        let store = empty_store().await;
        let key = CartProvider::sync_scope(store, || use_cart().unwrap().key().to_owned());
        assert_eq!(key, crate::DEFAULT_STORAGE_KEY);
    }
}
