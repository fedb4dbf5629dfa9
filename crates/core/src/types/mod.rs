//! Core types for Rocket Shoes.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod cart;
pub mod id;
pub mod product;
pub mod quantity;
pub mod stock;

pub use cart::{Cart, CartEntryError};
pub use id::*;
pub use product::{CatalogProduct, Product};
pub use quantity::{Quantity, QuantityError};
pub use stock::Stock;
