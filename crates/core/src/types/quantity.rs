//! Requested quantity of a product in the cart.

use core::fmt;
use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Errors that can occur when building a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// Zero or negative amounts are not stored; the product is absent instead.
    #[error("quantity must be at least 1 (got {0})")]
    NotPositive(i64),
    /// The amount does not fit the storage type.
    #[error("quantity {0} is too large")]
    TooLarge(i64),
}

/// A cart line amount, always at least 1.
///
/// An item whose amount would drop to zero is removed from the cart rather
/// than stored, so a zero quantity is unrepresentable. Deserializing `0` or a
/// negative number fails, which makes a persisted cart holding such an entry
/// malformed as a whole.
///
/// ```
/// use rocket_shoes_core::Quantity;
///
/// assert_eq!(Quantity::try_from(3_i64).unwrap().get(), 3);
/// assert!(Quantity::try_from(0_i64).is_err());
/// assert!(Quantity::try_from(-1_i64).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Returns the amount as a plain integer.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Returns the next amount up, or `None` on overflow.
    #[must_use]
    pub fn increment(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl TryFrom<i64> for Quantity {
    type Error = QuantityError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value <= 0 {
            return Err(QuantityError::NotPositive(value));
        }
        let value = u32::try_from(value).map_err(|_| QuantityError::TooLarge(value))?;
        NonZeroU32::new(value)
            .map(Self)
            .ok_or(QuantityError::NotPositive(0))
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.get()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
