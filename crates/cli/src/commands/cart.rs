//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! tote list
//! tote list --json
//!
//! # Add one unit of a product
//! tote add --id 1 --title Shoe --image-url https://img.example/shoe.png --price 100
//!
//! # Change the quantity of a line
//! tote increment 1
//! tote decrement 1
//! ```
//!
//! Every command resolves the cart through `use_cart`, so it must run inside
//! the `CartProvider` scope set up by `main`.

use std::fmt::Write as _;

use thiserror::Error;
use tote_core::{Cart, ProductId, ProductRef};
use tote_store::{ContextError, use_cart};

/// Errors that can occur while running a cart command.
#[derive(Debug, Error)]
pub enum CartCommandError {
    /// The command ran without a cart in scope.
    #[error(transparent)]
    Context(#[from] ContextError),

    /// Rendering the cart as JSON failed.
    #[error("Failed to encode cart: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Print the current cart.
pub fn list(json: bool) -> Result<(), CartCommandError> {
    let cart = use_cart()?.products();
    let output = if json {
        serde_json::to_string_pretty(&cart)?
    } else {
        render_cart(&cart)
    };
    emit(&output);
    Ok(())
}

/// Add one unit of `product` and print the resulting cart.
pub async fn add(product: ProductRef) -> Result<(), CartCommandError> {
    let cart = use_cart()?.add_to_cart(product).await;
    emit(&render_cart(&cart));
    Ok(())
}

/// Add one unit to the line for `id` and print the resulting cart.
pub async fn increment(id: &ProductId) -> Result<(), CartCommandError> {
    let store = use_cart()?;
    if !store.products().contains(id) {
        tracing::warn!(product_id = %id, "Product is not in the cart");
    }
    let cart = store.increment(id).await;
    emit(&render_cart(&cart));
    Ok(())
}

/// Remove one unit from the line for `id` and print the resulting cart.
pub async fn decrement(id: &ProductId) -> Result<(), CartCommandError> {
    let store = use_cart()?;
    if !store.products().contains(id) {
        tracing::warn!(product_id = %id, "Product is not in the cart");
    }
    let cart = store.decrement(id).await;
    emit(&render_cart(&cart));
    Ok(())
}

#[allow(clippy::print_stdout)]
fn emit(output: &str) {
    println!("{output}");
}

/// Plain-text cart listing, one line per product plus a summary.
fn render_cart(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty".to_string();
    }

    let id_width = cart
        .items()
        .iter()
        .map(|item| item.id.as_str().len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for item in cart {
        let _ = writeln!(
            out,
            "{:<id_width$}  {:>4} x {:>10}  {}",
            item.id.as_str(),
            item.quantity.get(),
            item.price.to_string(),
            item.title,
        );
    }

    let units = cart.item_count();
    let _ = write!(
        out,
        "{} {}, {} {}",
        cart.len(),
        if cart.len() == 1 { "line" } else { "lines" },
        units,
        if units == 1 { "item" } else { "items" },
    );
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tote_core::Price;
    use tote_store::{CartProvider, CartStore, MemoryStorage};

    use super::*;

    fn product(id: &str, title: &str, units: i64) -> ProductRef {
        ProductRef {
            id: ProductId::parse(id).unwrap(),
            title: title.to_string(),
            image_url: String::new(),
            price: Price::from_units(units),
        }
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_cart(&Cart::new()), "Cart is empty");
    }

    #[test]
    fn test_render_lines_and_summary() {
        let mut cart = Cart::new();
        cart.add(product("1", "Shoe", 100));
        cart.add(product("1", "Shoe", 100));
        cart.add(product("22", "Sock", 5));

        let rendered = render_cart(&cart);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines.first().unwrap().starts_with("1 "));
        assert!(lines.first().unwrap().contains("2 x     100.00  Shoe"));
        assert!(lines.get(1).unwrap().starts_with("22"));
        assert_eq!(*lines.last().unwrap(), "2 lines, 3 items");
    }

    #[tokio::test]
    async fn test_commands_edit_cart_in_provider_scope() {
        let store = CartStore::load_default(Arc::new(MemoryStorage::new()))
            .await
            .unwrap();
        let shoe = ProductId::parse("1").unwrap();

        CartProvider::scope(store.clone(), async {
            add(product("1", "Shoe", 100)).await.unwrap();
            add(product("1", "Shoe", 100)).await.unwrap();
            increment(&shoe).await.unwrap();
            assert_eq!(store.products().get(&shoe).unwrap().quantity.get(), 3);

            decrement(&shoe).await.unwrap();
            assert_eq!(store.products().get(&shoe).unwrap().quantity.get(), 2);

            // Unknown ids warn and leave the cart alone.
            increment(&ProductId::parse("ghost").unwrap()).await.unwrap();
            assert_eq!(store.products().len(), 1);

            decrement(&shoe).await.unwrap();
            decrement(&shoe).await.unwrap();
            assert!(store.products().is_empty());

            list(true).unwrap();
        })
        .await;
    }

    #[test]
    fn test_commands_fail_outside_provider() {
        assert!(matches!(
            list(false),
            Err(CartCommandError::Context(ContextError::OutsideProvider))
        ));
    }
}
