//! Available inventory for a product.

use serde::{Deserialize, Serialize};

use super::ProductId;

/// Stock observed for a product at the time it was fetched.
///
/// Stock is never cached: every cart mutation that needs it fetches a
/// fresh value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub product_id: ProductId,
    pub amount: u32,
}

impl Stock {
    #[must_use]
    pub const fn new(product_id: ProductId, amount: u32) -> Self {
        Self { product_id, amount }
    }

    /// Whether `requested` units can be served from this stock.
    #[must_use]
    pub const fn covers(&self, requested: u32) -> bool {
        requested <= self.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_covers() {
        let stock = Stock::new(ProductId::new(1), 2);
        assert!(stock.covers(1));
        assert!(stock.covers(2));
        assert!(!stock.covers(3));
    }

    #[test]
    fn test_empty_stock_covers_nothing() {
        let stock = Stock::new(ProductId::new(1), 0);
        assert!(!stock.covers(1));
    }
}
