//! The cart state manager.
//!
//! `CartStore` owns the in-memory [`Cart`] for one session. It seeds itself
//! from durable storage, validates mutations against live stock, and writes
//! every successful mutation through to storage before it becomes visible.
//!
//! Mutations take `&mut self`: a store cannot run two mutations at once, and
//! callers sharing one across tasks must serialize access themselves (for
//! example behind a `tokio::sync::Mutex`).

use std::sync::Arc;

use rocket_shoes_core::{Cart, Product, ProductId, Quantity};
use tracing::{debug, info, instrument, warn};

use crate::api::ApiClient;
use crate::config::CartConfig;
use crate::error::{CartError, CartOperation};
use crate::notifier::{Notifier, TracingNotifier};
use crate::services::{CatalogService, InventoryService};
use crate::storage::{DurableStore, FileStore};

/// Collaborators a [`CartStore`] depends on.
///
/// Cheap to clone; every field is shared.
#[derive(Clone)]
pub struct CartServices {
    pub inventory: Arc<dyn InventoryService>,
    pub catalog: Arc<dyn CatalogService>,
    pub storage: Arc<dyn DurableStore>,
    pub notifier: Arc<dyn Notifier>,
}

impl CartServices {
    /// Wire the HTTP API client, file store and tracing notifier from
    /// configuration.
    #[must_use]
    pub fn from_config(config: &CartConfig) -> Self {
        let api = ApiClient::new(&config.api);

        Self {
            inventory: Arc::new(api.clone()),
            catalog: Arc::new(api),
            storage: Arc::new(FileStore::new(&config.storage_dir)),
            notifier: Arc::new(TracingNotifier),
        }
    }

    /// Replace the notifier.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }
}

/// What a mutation did, as observed by the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The new cart is in memory and in durable storage.
    Committed,
    /// Nothing changed; exactly one notification was sent.
    Rejected,
    /// Invalid input silently ignored; nothing changed, nothing notified.
    Ignored,
}

impl MutationOutcome {
    #[must_use]
    pub const fn is_committed(self) -> bool {
        matches!(self, Self::Committed)
    }
}

/// Session-scoped cart with stock validation and write-through persistence.
pub struct CartStore {
    cart: Cart,
    key: String,
    services: CartServices,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.key)
            .field("cart", &self.cart)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Create a store seeded from the blob stored under `key`.
    ///
    /// Never fails: a missing, unreadable or malformed blob yields an empty
    /// cart. The stored blob is left untouched until the next commit.
    #[instrument(skip(services, key), fields(key = tracing::field::Empty))]
    pub fn load(services: CartServices, key: impl Into<String>) -> Self {
        let key = key.into();
        tracing::Span::current().record("key", key.as_str());

        let cart = load_cart(services.storage.as_ref(), &key);
        Self {
            cart,
            key,
            services,
        }
    }

    /// Create a store wired from configuration.
    #[must_use]
    pub fn from_config(config: &CartConfig) -> Self {
        Self::load(CartServices::from_config(config), config.storage_key.clone())
    }

    /// Current cart snapshot.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Storage key the cart is persisted under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Add one unit of a product, inserting it from the catalog if absent.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(&mut self, product_id: ProductId) -> MutationOutcome {
        let result = self.try_add(product_id).await;
        self.settle(CartOperation::Add, product_id, result)
    }

    /// Remove a product entirely. No stock check is made.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn remove_product(&mut self, product_id: ProductId) -> MutationOutcome {
        let result = self.try_remove(product_id);
        self.settle(CartOperation::Remove, product_id, result)
    }

    /// Set a product's amount to an absolute value.
    ///
    /// An `amount` of zero or less is ignored: nothing changes and nothing is
    /// notified. It does not remove the product.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn update_product_amount(
        &mut self,
        product_id: ProductId,
        amount: i64,
    ) -> MutationOutcome {
        if amount <= 0 {
            debug!("Ignoring non-positive amount");
            return MutationOutcome::Ignored;
        }
        let result = self.try_update(product_id, amount).await;
        self.settle(CartOperation::Update, product_id, result)
    }

    async fn try_add(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let mut updated = self.cart.clone();
        let current = updated.get(product_id).map(|product| product.amount);

        let stock = self
            .services
            .inventory
            .stock(product_id)
            .await
            .map_err(CartError::Inventory)?;

        let requested = match current {
            Some(amount) => amount.increment(),
            None => Some(Quantity::ONE),
        };
        let requested = requested
            .filter(|amount| stock.covers(amount.get()))
            .ok_or_else(|| CartError::StockExceeded {
                product_id,
                requested: current.map_or(0, |amount| i64::from(amount.get())) + 1,
                available: stock.amount,
            })?;

        if current.is_some() {
            updated.set_amount(product_id, requested)?;
        } else {
            let catalog = self
                .services
                .catalog
                .product(product_id)
                .await
                .map_err(CartError::Catalog)?;
            updated.push(Product::from_catalog(catalog, requested))?;
        }

        self.commit(updated)
    }

    fn try_remove(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let mut updated = self.cart.clone();
        updated.remove(product_id)?;
        self.commit(updated)
    }

    async fn try_update(&mut self, product_id: ProductId, amount: i64) -> Result<(), CartError> {
        let stock = self
            .services
            .inventory
            .stock(product_id)
            .await
            .map_err(CartError::Inventory)?;

        let exceeded = || CartError::StockExceeded {
            product_id,
            requested: amount,
            available: stock.amount,
        };
        if amount > i64::from(stock.amount) {
            return Err(exceeded());
        }
        let amount = Quantity::try_from(amount).map_err(|_| exceeded())?;

        let mut updated = self.cart.clone();
        updated.set_amount(product_id, amount)?;
        self.commit(updated)
    }

    /// Persist `updated`, then make it the current cart.
    ///
    /// The blob is written before the in-memory swap, so a failed write
    /// leaves both copies on the previous cart.
    fn commit(&mut self, updated: Cart) -> Result<(), CartError> {
        let blob = serde_json::to_string(&updated)?;
        self.services.storage.set(&self.key, &blob)?;
        self.cart = updated;
        Ok(())
    }

    fn settle(
        &self,
        operation: CartOperation,
        product_id: ProductId,
        result: Result<(), CartError>,
    ) -> MutationOutcome {
        match result {
            Ok(()) => {
                info!(
                    %operation,
                    %product_id,
                    items = self.cart.len(),
                    total_quantity = self.cart.total_quantity(),
                    "Cart committed"
                );
                MutationOutcome::Committed
            }
            Err(err) => {
                if err.is_fault() {
                    let event_id = sentry::capture_error(&err);
                    tracing::error!(
                        error = %err,
                        %operation,
                        %product_id,
                        sentry_event_id = %event_id,
                        "Cart operation failed"
                    );
                } else {
                    warn!(error = %err, %operation, %product_id, "Cart operation rejected");
                }
                self.services.notifier.error(err.user_message(operation));
                MutationOutcome::Rejected
            }
        }
    }
}

fn load_cart(storage: &dyn DurableStore, key: &str) -> Cart {
    let blob = match storage.get(key) {
        Ok(Some(blob)) => blob,
        Ok(None) => {
            debug!("No stored cart, starting empty");
            return Cart::new();
        }
        Err(e) => {
            warn!(error = %e, "Failed to read stored cart, starting empty");
            return Cart::new();
        }
    };

    match serde_json::from_str::<Cart>(&blob) {
        Ok(cart) => {
            debug!(items = cart.len(), "Loaded stored cart");
            cart
        }
        Err(e) => {
            warn!(error = %e, "Stored cart is malformed, starting empty");
            Cart::new()
        }
    }
}
