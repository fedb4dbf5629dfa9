//! Inventory and catalog API client.
//!
//! # Architecture
//!
//! - One `reqwest` client serves both collaborators the cart needs:
//!   - `GET {base}/stock/{id}` → `{ "amount": integer }`
//!   - `GET {base}/products/{id}` → product fields without `amount`
//! - The remote service is the source of truth for stock; stock responses
//!   are never cached.
//! - Catalog metadata is cached in-memory via `moka` when a TTL is configured.
//!
//! # Example
//!
//! ```rust,ignore
//! use rocket_shoes_cart::api::ApiClient;
//! use rocket_shoes_cart::services::InventoryService;
//!
//! let client = ApiClient::new(&config.api);
//! let stock = client.stock(ProductId::new(1)).await?;
//! ```

mod cache;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use rocket_shoes_core::{CatalogProduct, ProductId, Stock};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::ApiConfig;
use crate::services::{CatalogService, InventoryService};

use cache::CatalogCache;

/// Errors that can occur when talking to the inventory/catalog API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Non-success status other than 404/429.
    #[error("HTTP {status}: {body}")]
    Status {
        /// Response status code.
        status: u16,
        /// Truncated response body.
        body: String,
    },

    /// The catalog answered with a different product than requested.
    #[error("Requested product {requested}, received product {received}")]
    ProductMismatch {
        requested: ProductId,
        received: ProductId,
    },
}

/// Stock payload as served by `/stock/{id}`; other fields are ignored.
#[derive(Debug, Deserialize)]
struct StockResponse {
    amount: u32,
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the inventory/catalog API.
///
/// Cheap to clone; clones share the HTTP connection pool and catalog cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    token: Option<SecretString>,
    cache: Option<CatalogCache>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("token", &self.inner.token.as_ref().map(|_| "[REDACTED]"))
            .field("cached", &self.inner.cache.is_some())
            .finish()
    }
}

impl ApiClient {
    /// Create a new API client.
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create an API client around an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: reqwest::Client, config: &ApiConfig) -> Self {
        let base_url = config.base_url.as_str().trim_end_matches('/').to_string();

        Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url,
                token: config.token.clone(),
                cache: config.catalog_cache_ttl.map(CatalogCache::new),
            }),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.inner.base_url)
    }

    /// Execute a GET request and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let mut request = self
            .inner
            .client
            .get(self.endpoint(path))
            .header("Accept", "application/json");
        if let Some(token) = &self.inner.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        // Check for rate limiting
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ApiError::RateLimited(retry_after));
        }

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path.to_string()));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %truncate(&response_text, 500),
                "API returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: truncate(&response_text, 200),
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %truncate(&response_text, 500),
                "Failed to parse API response"
            );
            ApiError::Parse(e)
        })
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[async_trait]
impl InventoryService for ApiClient {
    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn stock(&self, product_id: ProductId) -> Result<Stock, ApiError> {
        let response: StockResponse = self.get_json(&format!("stock/{product_id}")).await?;
        debug!(amount = response.amount, "Fetched stock");
        Ok(Stock::new(product_id, response.amount))
    }
}

#[async_trait]
impl CatalogService for ApiClient {
    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn product(&self, product_id: ProductId) -> Result<CatalogProduct, ApiError> {
        if let Some(cache) = &self.inner.cache
            && let Some(product) = cache.get(product_id).await
        {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let product: CatalogProduct = self.get_json(&format!("products/{product_id}")).await?;
        if product.id != product_id {
            return Err(ApiError::ProductMismatch {
                requested: product_id,
                received: product.id,
            });
        }

        if let Some(cache) = &self.inner.cache {
            cache.insert(product.clone()).await;
        }

        Ok(product)
    }
}
