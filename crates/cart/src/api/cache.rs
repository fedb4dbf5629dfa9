//! Cache for catalog responses.

use std::time::Duration;

use moka::future::Cache;
use rocket_shoes_core::{CatalogProduct, ProductId};

const MAX_CACHED_PRODUCTS: u64 = 1000;

/// Catalog metadata keyed by product id.
#[derive(Clone)]
pub struct CatalogCache {
    products: Cache<ProductId, CatalogProduct>,
}

impl CatalogCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            products: Cache::builder()
                .max_capacity(MAX_CACHED_PRODUCTS)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub async fn get(&self, id: ProductId) -> Option<CatalogProduct> {
        self.products.get(&id).await
    }

    pub async fn insert(&self, product: CatalogProduct) {
        self.products.insert(product.id, product).await;
    }
}
