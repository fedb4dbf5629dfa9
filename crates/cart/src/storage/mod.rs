//! Durable key-value storage for the serialized cart.
//!
//! The cart is persisted as a single blob under a fixed key. Two stores are
//! provided:
//!
//! - [`FileStore`] - one file per key under a directory, survives restarts
//! - [`MemoryStore`] - process-local, for tests and headless consumers

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Errors that can occur when reading or writing durable storage.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The key cannot be stored.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// The stored bytes are not UTF-8 text.
    #[error("Stored value for {0} is not valid UTF-8")]
    NotUtf8(String),
}

/// Key-value persistence surface holding serialized blobs.
pub trait DurableStore: Send + Sync {
    /// Read the value stored under `key`, `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the underlying storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the value cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete whatever is stored under `key`. Deleting a missing key is not
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the underlying storage cannot be modified.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}
