//! Integration tests for Rocket Shoes.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocket-shoes-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `api_client` - HTTP client against a `mockito` server
//! - `cart_session` - `CartStore` over HTTP and a temp-dir `FileStore`
//! - `cart_properties` - `proptest` over random operation sequences
//!
//! This library holds the shared fixtures.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use mockito::{Mock, ServerGuard};
use rocket_shoes_cart::api::{ApiClient, ApiError};
use rocket_shoes_cart::config::ApiConfig;
use rocket_shoes_cart::{
    CartServices, CartStore, CatalogService, FileStore, InventoryService, RecordingNotifier,
};
use rocket_shoes_core::{CatalogProduct, ProductId, Stock};
use serde_json::{Value, json};
use url::Url;

/// Storage key used by every test session.
pub const TEST_KEY: &str = "@RocketShoes:cart";

/// Catalog payload for a product.
#[must_use]
pub fn product_json(id: i64, title: &str, price: f64) -> Value {
    json!({
        "id": id,
        "title": title,
        "price": price,
        "image": format!("https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/modulo-redux/tenis{id}.jpg"),
    })
}

/// API configuration pointing at a mock server, without catalog cache.
#[must_use]
pub fn api_config(server: &ServerGuard) -> ApiConfig {
    ApiConfig::new(Url::parse(&server.url()).unwrap())
}

/// Serve `GET /stock/{id}`.
pub async fn mock_stock(server: &mut ServerGuard, id: i64, amount: u32) -> Mock {
    server
        .mock("GET", format!("/stock/{id}").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "id": id, "amount": amount }).to_string())
        .create_async()
        .await
}

/// Serve `GET /products/{id}`.
pub async fn mock_product(server: &mut ServerGuard, id: i64, title: &str, price: f64) -> Mock {
    server
        .mock("GET", format!("/products/{id}").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(product_json(id, title, price).to_string())
        .create_async()
        .await
}

/// One shopper session: an HTTP-backed store persisted under `dir`.
pub struct Session {
    pub store: CartStore,
    pub storage: Arc<FileStore>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Session {
    /// Open a session against the API at `config`, loading whatever was
    /// persisted under `dir` by a previous session.
    #[must_use]
    pub fn open(config: &ApiConfig, dir: &Path) -> Self {
        let api = ApiClient::new(config);
        let storage = Arc::new(FileStore::new(dir));
        let notifier = Arc::new(RecordingNotifier::new());
        let services = CartServices {
            inventory: Arc::new(api.clone()),
            catalog: Arc::new(api),
            storage: storage.clone(),
            notifier: notifier.clone(),
        };

        Self {
            store: CartStore::load(services, TEST_KEY),
            storage,
            notifier,
        }
    }
}

/// In-memory shop with mutable stock, for tests that need no HTTP.
#[derive(Debug, Default)]
pub struct FakeShop {
    stock: Mutex<HashMap<i64, u32>>,
}

impl FakeShop {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_stock(&self, id: i64, amount: u32) {
        self.stock.lock().unwrap().insert(id, amount);
    }

    #[must_use]
    pub fn stock_of(&self, id: i64) -> Option<u32> {
        self.stock.lock().unwrap().get(&id).copied()
    }
}

#[async_trait]
impl InventoryService for FakeShop {
    async fn stock(&self, product_id: ProductId) -> Result<Stock, ApiError> {
        self.stock_of(product_id.as_i64())
            .map(|amount| Stock::new(product_id, amount))
            .ok_or_else(|| ApiError::NotFound(format!("stock/{product_id}")))
    }
}

#[async_trait]
impl CatalogService for FakeShop {
    async fn product(&self, product_id: ProductId) -> Result<CatalogProduct, ApiError> {
        let id = product_id.as_i64();
        if self.stock_of(id).is_none() {
            return Err(ApiError::NotFound(format!("products/{product_id}")));
        }
        #[allow(clippy::cast_precision_loss)]
        let price = (id * 10) as f64;
        Ok(serde_json::from_value(product_json(id, &format!("Shoe {id}"), price)).unwrap())
    }
}
