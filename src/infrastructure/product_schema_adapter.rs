use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::errors::{CatalogError, CatalogResult};
use crate::domain::product::{calculate_final_price, Product};
use crate::domain::wire_product::WireProduct;

/// Adapter to convert between the catalog API's wire records and the canonical product
pub struct ProductSchemaAdapter;

impl ProductSchemaAdapter {
    /// Convert a wire record to a canonical Product.
    ///
    /// Missing strings become empty, missing numbers become 0, and only an
    /// `available` flag of exactly 1 reads as available. A server-computed
    /// `finalPrice` is ignored; the canonical product derives its own.
    pub fn to_frontend(record: Option<&WireProduct>) -> CatalogResult<Product> {
        let Some(record) = record else {
            warn!("Wire product is null; nothing to adapt");
            return Err(CatalogError::adaptation("Backend product is null"));
        };

        let product = Product {
            barcode: record.barcode.clone().unwrap_or_default(),
            name: record.item.clone().unwrap_or_default(),
            category: record.category.clone().unwrap_or_default(),
            price: record.price.unwrap_or(0),
            discount: record.discount.unwrap_or(0),
            available: record.available == Some(1),
        };

        if let Some(server_final) = record.final_price {
            let derived = product.final_price();
            if server_final != derived {
                debug!(
                    barcode = %product.barcode,
                    server_final,
                    derived,
                    "Server finalPrice disagrees with derived value; using derived"
                );
            }
        }

        Ok(product)
    }

    /// Convert a canonical Product to the wire record sent on create/update.
    ///
    /// Barcode and name are the backend's identity and display fields, so an
    /// empty value for either is rejected here rather than by the server.
    pub fn to_backend(product: &Product) -> CatalogResult<WireProduct> {
        if product.barcode.is_empty() {
            warn!("Product is missing required barcode field");
            return Err(CatalogError::validation("barcode", "Product barcode is required"));
        }
        if product.name.is_empty() {
            warn!(barcode = %product.barcode, "Product is missing required name field");
            return Err(CatalogError::validation("name", "Product name is required"));
        }

        Ok(WireProduct::new(
            product.barcode.clone(),
            product.name.clone(),
            product.category.clone(),
            product.price,
            product.discount,
            i64::from(product.available),
        ))
    }

    /// Convert a raw list body to canonical products.
    ///
    /// A body that is not a JSON array yields an empty list. Null entries and
    /// entries that do not decode as a wire record are dropped individually;
    /// order of the remaining entries is preserved.
    pub fn to_frontend_list(body: &Value) -> Vec<Product> {
        let Some(entries) = body.as_array() else {
            warn!(kind = json_kind(body), "Product list body is not an array; using empty list");
            return Vec::new();
        };

        entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| !entry.is_null())
            .filter_map(|(index, entry)| match WireProduct::deserialize(entry) {
                Ok(record) => Self::to_frontend(Some(&record)).ok(),
                Err(e) => {
                    warn!(index, error = %e, "Skipping malformed product entry");
                    None
                }
            })
            .collect()
    }

    /// Price after discount, exposed alongside the conversions for callers that
    /// only hold the raw numbers
    pub const fn calculate_final_price(price: i64, discount: i64) -> i64 {
        calculate_final_price(price, discount)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
