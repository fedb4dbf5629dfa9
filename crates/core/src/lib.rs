//! Rocket Shoes Core - Shared cart types.
//!
//! This crate provides the data model shared by the cart store and its
//! consumers:
//! - `cart` - Cart state manager (stock validation, persistence)
//! - `cli` - Command-line consumer of the cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. Cart invariants (positive amounts, unique product ids)
//! are enforced by the types themselves, including on deserialization.
//!
//! # Modules
//!
//! - [`types`] - Product ids, quantities, products, stock, and the cart itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
