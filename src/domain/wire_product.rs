use serde::{Deserialize, Serialize};

/// Product record as the catalog API stores and exchanges it.
///
/// The backend names the display field `item` and encodes availability as an
/// integer flag (`1` available, `0` not). Every field is optional on the way
/// in because the document store does not enforce a schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireProduct {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<i64>,
    /// Computed by the server on read; never sent back.
    #[serde(default, rename = "finalPrice", skip_serializing)]
    pub final_price: Option<i64>,
}

impl WireProduct {
    /// Fully populated record, the shape written on create and update
    pub fn new(
        barcode: impl Into<String>,
        item: impl Into<String>,
        category: impl Into<String>,
        price: i64,
        discount: i64,
        available: i64,
    ) -> Self {
        Self {
            barcode: Some(barcode.into()),
            item: Some(item.into()),
            category: Some(category.into()),
            price: Some(price),
            discount: Some(discount),
            available: Some(available),
            final_price: None,
        }
    }
}
