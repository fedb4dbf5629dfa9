//! Rocket Shoes Cart - shopping cart state manager.
//!
//! Holds the products a shopper intends to buy, enforces stock limits by
//! querying the inventory service, and persists the cart across sessions.
//!
//! # Architecture
//!
//! - [`CartStore`] owns the cart for one session and exposes the three
//!   mutations (`add_product`, `remove_product`, `update_product_amount`)
//!   plus a read-only snapshot
//! - Collaborators sit behind traits so they can be swapped:
//!   [`InventoryService`], [`CatalogService`], [`DurableStore`], [`Notifier`]
//! - [`api::ApiClient`] implements both remote services over HTTP
//! - Failures never reach the caller as errors; each rejected mutation sends
//!   one message through the notifier and leaves the cart untouched
//!
//! # Example
//!
//! ```rust,ignore
//! use rocket_shoes_cart::{CartConfig, CartStore};
//!
//! let config = CartConfig::from_env()?;
//! let mut store = CartStore::from_config(&config);
//!
//! store.add_product(ProductId::new(1)).await;
//! store.update_product_amount(ProductId::new(1), 3).await;
//! for product in store.cart() {
//!     println!("{} x{}", product.title(), product.amount);
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod notifier;
pub mod services;
pub mod storage;
pub mod store;

pub use config::{CartConfig, ConfigError, LogFormat};
pub use error::{CartError, CartOperation};
pub use notifier::{Notifier, RecordingNotifier, TracingNotifier};
pub use services::{CatalogService, InventoryService};
pub use storage::{DurableStore, FileStore, MemoryStore, StoreError};
pub use store::{CartServices, CartStore, MutationOutcome};
