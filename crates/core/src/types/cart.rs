//! The cart: an ordered, id-unique list of products.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::{Product, ProductId, Quantity};

/// Errors from mutating a [`Cart`] in ways that would break its invariants.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartEntryError {
    /// The product is not in the cart.
    #[error("product {0} is not in the cart")]
    NotFound(ProductId),
    /// The product is already in the cart.
    #[error("product {0} appears more than once")]
    Duplicate(ProductId),
}

/// Ordered sequence of products, unique by id.
///
/// Quantity is tracked through each product's `amount`, never by
/// repetition. The JSON form is a bare array of products; deserializing an
/// array with a repeated id fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Cart(Vec<Product>);

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Products in insertion order.
    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.0.iter()
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.0.iter().find(|product| product.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all amounts.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.0.iter().map(|product| u64::from(product.amount.get())).sum()
    }

    /// Sum of price times amount over all products.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.0.iter().map(Product::line_total).sum()
    }

    /// Append a product that is not yet in the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartEntryError::Duplicate`] if a product with the same id is
    /// already present.
    pub fn push(&mut self, product: Product) -> Result<(), CartEntryError> {
        if self.contains(product.id()) {
            return Err(CartEntryError::Duplicate(product.id()));
        }
        self.0.push(product);
        Ok(())
    }

    /// Overwrite the amount of a product already in the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartEntryError::NotFound`] if the product is absent.
    pub fn set_amount(&mut self, id: ProductId, amount: Quantity) -> Result<(), CartEntryError> {
        let product = self
            .0
            .iter_mut()
            .find(|product| product.id() == id)
            .ok_or(CartEntryError::NotFound(id))?;
        product.amount = amount;
        Ok(())
    }

    /// Remove a product entirely, keeping the order of the rest.
    ///
    /// # Errors
    ///
    /// Returns [`CartEntryError::NotFound`] if the product is absent.
    pub fn remove(&mut self, id: ProductId) -> Result<Product, CartEntryError> {
        let index = self
            .0
            .iter()
            .position(|product| product.id() == id)
            .ok_or(CartEntryError::NotFound(id))?;
        Ok(self.0.remove(index))
    }

    #[must_use]
    pub fn into_items(self) -> Vec<Product> {
        self.0
    }
}

impl TryFrom<Vec<Product>> for Cart {
    type Error = CartEntryError;

    fn try_from(products: Vec<Product>) -> Result<Self, Self::Error> {
        let mut cart = Self(Vec::with_capacity(products.len()));
        for product in products {
            cart.push(product)?;
        }
        Ok(cart)
    }
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let products = Vec::<Product>::deserialize(deserializer)?;
        Self::try_from(products).map_err(serde::de::Error::custom)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
