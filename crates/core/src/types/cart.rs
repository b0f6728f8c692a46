//! Cart lines and the ordered cart collection.
//!
//! [`Cart`] is the single place the cart invariants live:
//!
//! - no two lines share a [`ProductId`]
//! - every line has a quantity of at least one ([`Quantity`] cannot be zero)
//!
//! Operations here are pure; persistence and concurrency are the store's
//! concern.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId, Quantity};

/// Errors raised when building a [`Cart`] from untrusted lines.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// Two lines carry the same product id.
    #[error("duplicate cart line for product {0}")]
    DuplicateId(ProductId),
}

/// A product as offered to the cart, before it has a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    pub id: ProductId,
    pub title: String,
    pub image_url: String,
    pub price: Price,
}

/// One product line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product identifier; unique within a cart.
    pub id: ProductId,
    /// Display name.
    pub title: String,
    /// Display asset reference.
    pub image_url: String,
    /// Unit price.
    pub price: Price,
    /// Units in the cart.
    pub quantity: Quantity,
}

impl CartItem {
    /// Start a new line for `product` with a single unit.
    #[must_use]
    pub fn from_product(product: ProductRef) -> Self {
        Self {
            id: product.id,
            title: product.title,
            image_url: product.image_url,
            price: product.price,
            quantity: Quantity::ONE,
        }
    }
}

/// Outcome of [`Cart::decrement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decrement {
    /// The line lost one unit and is still in the cart.
    Decreased(Quantity),
    /// The line was at one unit and has been removed.
    Removed,
    /// No line matched the id.
    NotFound,
}

/// Ordered sequence of cart lines keyed by product id.
///
/// Insertion order is kept for display. Serializes as a bare JSON array of
/// [`CartItem`]; deserializing an array with repeated ids fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartItem>", into = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Look up the line for `id`.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Whether a line for `id` exists.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Add one unit of `product`.
    ///
    /// A product already in the cart only has its quantity bumped; the
    /// existing title, image and price are kept and the incoming ones are
    /// ignored. Returns the resulting quantity.
    pub fn add(&mut self, product: ProductRef) -> Quantity {
        if let Some(item) = self.get_mut(&product.id) {
            item.quantity = item.quantity.incremented();
            return item.quantity;
        }

        self.items.push(CartItem::from_product(product));
        Quantity::ONE
    }

    /// Add one unit to the line for `id`.
    ///
    /// Returns the new quantity, or `None` when no line matches.
    pub fn increment(&mut self, id: &ProductId) -> Option<Quantity> {
        let item = self.get_mut(id)?;
        item.quantity = item.quantity.incremented();
        Some(item.quantity)
    }

    /// Remove one unit from the line for `id`, dropping the line when it was
    /// the last unit.
    pub fn decrement(&mut self, id: &ProductId) -> Decrement {
        let Some(index) = self.position(id) else {
            return Decrement::NotFound;
        };

        let Some(item) = self.items.get_mut(index) else {
            return Decrement::NotFound;
        };

        match item.quantity.decremented() {
            Some(quantity) => {
                item.quantity = quantity;
                Decrement::Decreased(quantity)
            }
            None => {
                self.items.remove(index);
                Decrement::Removed
            }
        }
    }

    /// Consume the cart and return its lines.
    #[must_use]
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    fn position(&self, id: &ProductId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    fn get_mut(&mut self, id: &ProductId) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|item| &item.id == id)
    }
}

impl TryFrom<Vec<CartItem>> for Cart {
    type Error = CartError;

    fn try_from(items: Vec<CartItem>) -> Result<Self, Self::Error> {
        let mut seen = std::collections::HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(&item.id) {
                return Err(CartError::DuplicateId(item.id.clone()));
            }
        }
        Ok(Self { items })
    }
}

impl From<Cart> for Vec<CartItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
