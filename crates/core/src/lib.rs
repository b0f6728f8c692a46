//! Tote Core - Shared cart types.
//!
//! This crate provides the domain types used by the Tote cart store and its
//! consumers:
//! - `tote-store` - Cart state container with persistence
//! - `tote-cli` - Command-line front end over the file backend
//!
//! # Architecture
//!
//! The core crate contains only types and pure operations - no I/O, no
//! storage access, no async. This keeps it lightweight and lets the cart
//! invariants be tested in isolation.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices and quantities, and
//!   the [`Cart`] collection itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
