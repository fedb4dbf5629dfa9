//! Cart commands.
//!
//! Each mutating command loads the persisted cart, applies one operation and
//! exits. The store's notifier logs rejections; the command turns them into
//! a non-zero exit.

use std::io::Write;

use rocket_shoes_cart::{
    CartConfig, CartStore, DurableStore, FileStore, MutationOutcome, StoreError,
};
use rocket_shoes_core::{Cart, ProductId};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The cart rejected the mutation (already reported).
    #[error("cart was not changed")]
    Rejected,

    /// Durable storage failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Writing output failed.
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Print the cart to stdout.
pub fn show(config: &CartConfig, json: bool) -> Result<(), CommandError> {
    let store = CartStore::from_config(config);
    let mut out = std::io::stdout().lock();

    if json {
        serde_json::to_writer_pretty(&mut out, store.cart())?;
        writeln!(out)?;
    } else {
        write_table(&mut out, store.cart())?;
    }
    Ok(())
}

/// Add one unit of a product.
pub async fn add(config: &CartConfig, product_id: ProductId) -> Result<(), CommandError> {
    let mut store = CartStore::from_config(config);
    finish(store.add_product(product_id).await)
}

/// Remove a product.
pub fn remove(config: &CartConfig, product_id: ProductId) -> Result<(), CommandError> {
    let mut store = CartStore::from_config(config);
    finish(store.remove_product(product_id))
}

/// Set a product's amount.
pub async fn update(
    config: &CartConfig,
    product_id: ProductId,
    amount: i64,
) -> Result<(), CommandError> {
    let mut store = CartStore::from_config(config);
    finish(store.update_product_amount(product_id, amount).await)
}

/// Delete the persisted cart.
pub fn clear(config: &CartConfig) -> Result<(), CommandError> {
    FileStore::new(&config.storage_dir).remove(&config.storage_key)?;
    tracing::info!(key = %config.storage_key, "Cart cleared");
    Ok(())
}

fn finish(outcome: MutationOutcome) -> Result<(), CommandError> {
    match outcome {
        MutationOutcome::Committed => Ok(()),
        MutationOutcome::Ignored => {
            tracing::info!("Nothing to do");
            Ok(())
        }
        MutationOutcome::Rejected => Err(CommandError::Rejected),
    }
}

fn write_table(out: &mut impl Write, cart: &Cart) -> std::io::Result<()> {
    if cart.is_empty() {
        return writeln!(out, "Cart is empty");
    }

    writeln!(out, "{:>6}  {:<40}  {:>10}  {:>6}  {:>10}", "ID", "TITLE", "PRICE", "QTY", "TOTAL")?;
    for product in cart {
        writeln!(
            out,
            "{:>6}  {:<40}  {:>10.2}  {:>6}  {:>10.2}",
            product.id().as_i64(),
            product.title(),
            product.price(),
            product.amount.get(),
            product.line_total()
        )?;
    }
    writeln!(
        out,
        "{} item(s), subtotal {:.2}",
        cart.total_quantity(),
        cart.subtotal()
    )
}
