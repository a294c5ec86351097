//! `ProductApi` over the catalog REST endpoints
//!
//! | Method | Path                        |
//! |--------|-----------------------------|
//! | GET    | /products                   |
//! | GET    | /products/{barcode}         |
//! | POST   | /products                   |
//! | PUT    | /products/{barcode}         |
//! | DELETE | /products/{barcode}         |
//! | GET    | /filter/price/{min}/{max}   |
//! | GET    | /sort/price                 |

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use crate::domain::errors::{CatalogError, CatalogResult};
use crate::domain::price_range::PriceRange;
use crate::domain::product::Product;
use crate::domain::repositories::{ApiResponse, ProductApi};
use crate::domain::wire_product::WireProduct;
use crate::infrastructure::http_client::{HttpClient, HttpResponse};
use crate::infrastructure::product_schema_adapter::ProductSchemaAdapter;

const PRODUCTS: &str = "products";

pub struct RestProductApi {
    http: HttpClient,
}

impl RestProductApi {
    pub const fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// List endpoints must answer with an array; anything else is logged and
    /// treated as an empty catalog rather than a failure.
    fn products_or_empty(endpoint: &str, response: HttpResponse) -> ApiResponse<Vec<Product>> {
        if !response.body.is_array() {
            warn!(endpoint, status = response.status, "Expected array but got a different body; returning empty list");
            return ApiResponse::new(response.status, Vec::new());
        }
        ApiResponse::new(response.status, ProductSchemaAdapter::to_frontend_list(&response.body))
    }

    /// Decode a single-record body; a null or non-object body is an adaptation failure
    fn single_product(response: HttpResponse) -> CatalogResult<ApiResponse<Product>> {
        let record = match response.body {
            Value::Null => None,
            body @ Value::Object(_) => Some(
                serde_json::from_value::<WireProduct>(body)
                    .map_err(|e| CatalogError::adaptation(format!("Malformed product record: {e}")))?,
            ),
            other => {
                return Err(CatalogError::adaptation(format!(
                    "Expected a product object, got: {other}"
                )));
            }
        };
        let product = ProductSchemaAdapter::to_frontend(record.as_ref())?;
        Ok(ApiResponse::new(response.status, product))
    }
}

#[async_trait]
impl ProductApi for RestProductApi {
    async fn list(&self) -> CatalogResult<ApiResponse<Vec<Product>>> {
        let response = self.http.get(&[PRODUCTS]).await?;
        let result = Self::products_or_empty("/products", response);
        info!(count = result.data.len(), "Fetched products");
        Ok(result)
    }

    async fn get_by_barcode(&self, barcode: &str) -> CatalogResult<ApiResponse<Product>> {
        let response = self.http.get(&[PRODUCTS, barcode]).await?;
        Self::single_product(response)
    }

    async fn create(&self, product: &Product) -> CatalogResult<ApiResponse<Product>> {
        let record = ProductSchemaAdapter::to_backend(product)?;
        let response = self.http.post(&[PRODUCTS], &record).await?;
        let created = Self::single_product(response)?;
        info!(barcode = %created.data.barcode, status = created.status, "Created product");
        Ok(created)
    }

    async fn update(&self, barcode: &str, product: &Product) -> CatalogResult<ApiResponse<Product>> {
        let record = ProductSchemaAdapter::to_backend(product)?;
        let response = self.http.put(&[PRODUCTS, barcode], &record).await?;
        let updated = Self::single_product(response)?;
        info!(barcode = %updated.data.barcode, "Updated product");
        Ok(updated)
    }

    async fn delete(&self, barcode: &str) -> CatalogResult<ApiResponse<String>> {
        let response = self.http.delete(&[PRODUCTS, barcode]).await?;
        let acknowledgement = match response.body {
            Value::Null => String::new(),
            Value::String(text) => text,
            other => other.to_string(),
        };
        info!(barcode, "Deleted product");
        Ok(ApiResponse::new(response.status, acknowledgement))
    }

    async fn filter_by_price_range(&self, range: PriceRange) -> CatalogResult<ApiResponse<Vec<Product>>> {
        let min = range.min.to_string();
        let max = range.max.to_string();
        let response = self.http.get(&["filter", "price", &min, &max]).await?;
        let result = Self::products_or_empty("/filter/price", response);
        info!(min = range.min, max = range.max, count = result.data.len(), "Filtered products by price");
        Ok(result)
    }

    async fn sorted_names_by_price(&self) -> CatalogResult<ApiResponse<Vec<String>>> {
        let response = self.http.get(&["sort", "price"]).await?;
        let Value::Array(entries) = response.body else {
            warn!(status = response.status, "Expected array of names; returning empty list");
            return Ok(ApiResponse::new(response.status, Vec::new()));
        };
        let names: Vec<String> = entries
            .into_iter()
            .filter_map(|entry| match entry {
                Value::String(name) => Some(name),
                other => {
                    warn!(entry = %other, "Skipping non-string entry in sorted names");
                    None
                }
            })
            .collect();
        Ok(ApiResponse::new(response.status, names))
    }
}
