//! Core types for Tote.
//!
//! This module provides type-safe wrappers for cart domain concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod quantity;

pub use cart::{Cart, CartError, CartItem, Decrement, ProductRef};
pub use id::{ProductId, ProductIdError};
pub use price::Price;
pub use quantity::Quantity;
