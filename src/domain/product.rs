use serde::{Deserialize, Serialize};

use crate::domain::errors::{CatalogError, CatalogResult};

/// Product in canonical (frontend) form.
///
/// `final_price` is not a field: it is derived from `price` and `discount` on
/// every read so it can never go stale after an edit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Product {
    /// Immutable join key between the canonical and wire forms
    pub barcode: String,
    pub name: String,
    pub category: String,
    /// Minor currency units (cents)
    pub price: i64,
    /// Percent, 0..=100
    pub discount: i64,
    pub available: bool,
}

/// Borrowed view of a product with the derived final price attached,
/// used where the product is rendered or serialized for display.
#[derive(Debug, Clone, Serialize)]
pub struct PricedProduct<'a> {
    #[serde(flatten)]
    pub product: &'a Product,
    #[serde(rename = "finalPrice")]
    pub final_price: i64,
}

/// `round(price * (100 - discount) / 100)` with round-half-up.
///
/// Evaluated in integer arithmetic: `floor((2n + 100) / 200)` where
/// `n = price * (100 - discount)` is exactly `floor(n / 100 + 0.5)`.
pub const fn calculate_final_price(price: i64, discount: i64) -> i64 {
    let numerator = price.saturating_mul(100_i64.saturating_sub(discount));
    numerator.saturating_mul(2).saturating_add(100).div_euclid(200)
}

impl Product {
    pub fn new(
        barcode: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        price: i64,
        discount: i64,
        available: bool,
    ) -> Self {
        Self {
            barcode: barcode.into(),
            name: name.into(),
            category: category.into(),
            price,
            discount,
            available,
        }
    }

    /// Price after discount, recomputed on every call
    pub const fn final_price(&self) -> i64 {
        calculate_final_price(self.price, self.discount)
    }

    pub const fn priced(&self) -> PricedProduct<'_> {
        PricedProduct {
            product: self,
            final_price: self.final_price(),
        }
    }

    /// Full field validation applied before a create or update leaves the client.
    ///
    /// Rules mirror what the catalog API enforces server-side, so a rejected
    /// product never costs a round trip.
    pub fn validate(&self) -> CatalogResult<()> {
        if self.barcode.trim().is_empty() {
            return Err(CatalogError::validation("barcode", "Product barcode is required"));
        }
        if self.name.trim().is_empty() {
            return Err(CatalogError::validation("name", "Product name is required"));
        }
        if self.category.trim().is_empty() {
            return Err(CatalogError::validation("category", "Product category is required"));
        }
        if self.price < 0 {
            return Err(CatalogError::validation(
                "price",
                "Product price must be a non-negative value",
            ));
        }
        if !(0..=100).contains(&self.discount) {
            return Err(CatalogError::validation(
                "discount",
                "Product discount must be between 0 and 100",
            ));
        }
        Ok(())
    }
}
