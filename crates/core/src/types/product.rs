//! Catalog products and cart lines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ProductId, Quantity};

/// Product metadata as served by the catalog.
///
/// Only the fields the cart relies on are typed. Any other catalog field is
/// kept verbatim in `extra` so the persisted cart round-trips the full
/// product without knowing its schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogProduct {
    /// Unique product id.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Image URL.
    #[serde(default)]
    pub image: String,
    /// Unit price. Plain number on the wire, no currency semantics.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Remaining catalog fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A product in the cart: catalog metadata plus the requested amount.
///
/// Serializes flat, e.g.
/// `{"id":1,"title":"Shoe","image":"","price":10.0,"amount":2}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(flatten)]
    pub catalog: CatalogProduct,
    pub amount: Quantity,
}

impl Product {
    /// Build a cart line from catalog metadata.
    ///
    /// A stray `amount` field coming from the catalog is dropped so it
    /// cannot shadow the cart amount when serialized.
    #[must_use]
    pub fn from_catalog(mut catalog: CatalogProduct, amount: Quantity) -> Self {
        catalog.extra.remove("amount");
        Self { catalog, amount }
    }

    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.catalog.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.catalog.title
    }

    #[must_use]
    pub const fn price(&self) -> Decimal {
        self.catalog.price
    }

    /// Price multiplied by amount.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.catalog.price * Decimal::from(self.amount.get())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn catalog_json() -> Value {
        json!({
            "id": 1,
            "title": "Tênis de Caminhada Leve Confortável",
            "price": 179.9,
            "image": "https://example.com/shoe.jpg",
            "brand": "Rocket"
        })
    }

    #[test]
    fn test_catalog_keeps_unknown_fields() {
        let catalog: CatalogProduct = serde_json::from_value(catalog_json()).unwrap();
        assert_eq!(catalog.id, ProductId::new(1));
        assert_eq!(catalog.price, Decimal::new(1799, 1));
        assert_eq!(catalog.extra.get("brand"), Some(&json!("Rocket")));
    }

    #[test]
    fn test_catalog_accepts_integer_price() {
        let catalog: CatalogProduct =
            serde_json::from_value(json!({"id": 2, "title": "Shoe", "price": 10})).unwrap();
        assert_eq!(catalog.price, Decimal::from(10));
        assert!(catalog.image.is_empty());
    }

    #[test]
    fn test_product_serializes_flat() {
        let catalog: CatalogProduct = serde_json::from_value(catalog_json()).unwrap();
        let product = Product::from_catalog(catalog, Quantity::ONE);
        let value = serde_json::to_value(&product).unwrap();

        assert_eq!(value["id"], json!(1));
        assert_eq!(value["amount"], json!(1));
        assert_eq!(value["brand"], json!("Rocket"));
        assert!(value.get("catalog").is_none());

        let back: Product = serde_json::from_value(value).unwrap();
        assert_eq!(back, product);
    }

    #[test]
    fn test_from_catalog_drops_stray_amount() {
        let mut raw = catalog_json();
        raw["amount"] = json!(99);
        let catalog: CatalogProduct = serde_json::from_value(raw).unwrap();
        let product = Product::from_catalog(catalog, Quantity::ONE);

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["amount"], json!(1));
    }

    #[test]
    fn test_product_requires_positive_amount() {
        let mut raw = catalog_json();
        raw["amount"] = json!(0);
        assert!(serde_json::from_value::<Product>(raw).is_err());
    }

    #[test]
    fn test_line_total() {
        let catalog: CatalogProduct =
            serde_json::from_value(json!({"id": 3, "title": "Shoe", "price": 12.5})).unwrap();
        let product = Product::from_catalog(catalog, Quantity::try_from(3_i64).unwrap());
        assert_eq!(product.line_total(), Decimal::new(375, 1));
    }
}
