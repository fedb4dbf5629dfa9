//! User-facing error notifications.
//!
//! The cart never returns failures to its consumer as errors. Instead every
//! rejected mutation produces exactly one message through a [`Notifier`],
//! which a UI can render as a toast, a CLI can log, and a test can capture.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Messages surfaced to the user.
pub mod messages {
    /// Requested amount exceeds available stock (add and update).
    pub const OUT_OF_STOCK: &str = "Requested quantity is out of stock";
    /// Adding a product failed for any other reason.
    pub const ADD_FAILED: &str = "Could not add the product to the cart";
    /// Removing a product failed.
    pub const REMOVE_FAILED: &str = "Could not remove the product from the cart";
    /// Updating a product amount failed for any other reason.
    pub const UPDATE_FAILED: &str = "Could not update the product quantity";
}

/// One-way, fire-and-forget error signal.
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
}

impl<F> Notifier for F
where
    F: Fn(&str) + Send + Sync,
{
    fn error(&self, message: &str) {
        self(message);
    }
}

/// Notifier that writes messages to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        tracing::warn!(target: "rocket_shoes_cart::notify", "{message}");
    }
}

/// Notifier that keeps every message, for headless consumers and tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages received so far, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.lock().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drain and return the recorded messages.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        self.lock().push(message.to_string());
    }
}
