//! Remote collaborators the cart validates against.
//!
//! Each call is awaited before the cart proceeds. Implementations are
//! shared behind `Arc`, so they must be `Send + Sync`.

use async_trait::async_trait;
use rocket_shoes_core::{CatalogProduct, ProductId, Stock};

use crate::api::ApiError;

/// Source of current stock for a product.
#[async_trait]
pub trait InventoryService: Send + Sync {
    /// Fetch the stock available right now.
    async fn stock(&self, product_id: ProductId) -> Result<Stock, ApiError>;
}

/// Source of product metadata.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Fetch full product metadata (everything except the cart amount).
    async fn product(&self, product_id: ProductId) -> Result<CatalogProduct, ApiError>;
}
