//! Cart mutation errors.
//!
//! Every failure is caught at the operation boundary of
//! [`CartStore`](crate::CartStore): logged, captured to Sentry when it is a
//! service or storage fault, and converted into exactly one user-facing
//! notification via [`CartError::user_message`].

use rocket_shoes_core::{CartEntryError, ProductId};
use thiserror::Error;

use crate::api::ApiError;
use crate::notifier::messages;
use crate::storage::StoreError;

/// The consumer-facing operation a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOperation {
    Add,
    Remove,
    Update,
}

impl CartOperation {
    /// Generic failure message for this operation.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Add => messages::ADD_FAILED,
            Self::Remove => messages::REMOVE_FAILED,
            Self::Update => messages::UPDATE_FAILED,
        }
    }
}

impl std::fmt::Display for CartOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Update => "update",
        })
    }
}

/// Why a cart mutation was rejected.
#[derive(Debug, Error)]
pub enum CartError {
    /// Requested amount exceeds available inventory.
    #[error("Product {product_id}: requested {requested}, only {available} in stock")]
    StockExceeded {
        product_id: ProductId,
        requested: i64,
        available: u32,
    },

    /// The product must be in the cart for this operation.
    #[error("Product {0} is not in the cart")]
    NotFound(ProductId),

    /// The product is already in the cart.
    #[error("Product {0} is already in the cart")]
    Duplicate(ProductId),

    /// Fetching stock failed.
    #[error("Inventory error: {0}")]
    Inventory(#[source] ApiError),

    /// Fetching product metadata failed.
    #[error("Catalog error: {0}")]
    Catalog(#[source] ApiError),

    /// Serializing the cart failed.
    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),

    /// Writing the cart to durable storage failed.
    #[error("Storage error: {0}")]
    Persist(#[from] StoreError),
}

impl From<CartEntryError> for CartError {
    fn from(err: CartEntryError) -> Self {
        match err {
            CartEntryError::NotFound(id) => Self::NotFound(id),
            CartEntryError::Duplicate(id) => Self::Duplicate(id),
        }
    }
}

impl CartError {
    /// Message shown to the user when `operation` fails with this error.
    #[must_use]
    pub const fn user_message(&self, operation: CartOperation) -> &'static str {
        match self {
            Self::StockExceeded { .. } => messages::OUT_OF_STOCK,
            _ => operation.failure_message(),
        }
    }

    /// Whether this is a fault in a collaborator rather than a rejected
    /// request.
    #[must_use]
    pub const fn is_fault(&self) -> bool {
        matches!(
            self,
            Self::Inventory(_) | Self::Catalog(_) | Self::Encode(_) | Self::Persist(_)
        )
    }
}
