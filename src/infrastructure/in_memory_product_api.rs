//! In-process catalog backend
//!
//! Keeps wire records in memory and answers with the same statuses and messages
//! as the catalog API, so the store and commands can run without a server
//! (offline mode, tests).

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::errors::{CatalogError, CatalogResult};
use crate::domain::price_range::PriceRange;
use crate::domain::product::Product;
use crate::domain::repositories::{ApiResponse, ProductApi};
use crate::domain::seed::seed_catalog;
use crate::domain::wire_product::WireProduct;
use crate::infrastructure::product_schema_adapter::ProductSchemaAdapter;

#[derive(Default)]
pub struct InMemoryProductApi {
    records: RwLock<Vec<WireProduct>>,
    unreachable: AtomicBool,
}

impl InMemoryProductApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-loaded with the seed catalog
    pub fn seeded() -> Self {
        Self::with_records(seed_catalog())
    }

    pub fn with_records(records: Vec<WireProduct>) -> Self {
        Self {
            records: RwLock::new(records),
            unreachable: AtomicBool::new(false),
        }
    }

    /// Simulate a transport outage: every call fails with a network error
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn check_reachable(&self) -> CatalogResult<()> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(CatalogError::network("Network Error"));
        }
        Ok(())
    }

    fn not_found(barcode: &str) -> CatalogError {
        CatalogError::api(404, format!("Product not found with barcode: {barcode}"))
    }

    /// Server-side validation; failures answer 400 with the rule's message
    fn validate_record(record: &WireProduct) -> CatalogResult<Product> {
        let product = ProductSchemaAdapter::to_frontend(Some(record))?;
        product
            .validate()
            .map_err(|e| CatalogError::api(400, e.to_string()))?;
        Ok(product)
    }

    fn adapt(record: &WireProduct) -> CatalogResult<Product> {
        ProductSchemaAdapter::to_frontend(Some(record))
    }

    fn matches(record: &WireProduct, barcode: &str) -> bool {
        record.barcode.as_deref() == Some(barcode)
    }
}

#[async_trait]
impl ProductApi for InMemoryProductApi {
    async fn list(&self) -> CatalogResult<ApiResponse<Vec<Product>>> {
        self.check_reachable()?;
        let records = self.records.read().await;
        let products = records.iter().map(Self::adapt).collect::<CatalogResult<Vec<_>>>()?;
        Ok(ApiResponse::new(200, products))
    }

    async fn get_by_barcode(&self, barcode: &str) -> CatalogResult<ApiResponse<Product>> {
        self.check_reachable()?;
        let records = self.records.read().await;
        let record = records
            .iter()
            .find(|r| Self::matches(r, barcode))
            .ok_or_else(|| Self::not_found(barcode))?;
        Ok(ApiResponse::new(200, Self::adapt(record)?))
    }

    async fn create(&self, product: &Product) -> CatalogResult<ApiResponse<Product>> {
        self.check_reachable()?;
        let record = ProductSchemaAdapter::to_backend(product)?;
        let stored = Self::validate_record(&record)?;

        let mut records = self.records.write().await;
        if records.iter().any(|r| Self::matches(r, &stored.barcode)) {
            return Err(CatalogError::api(
                400,
                format!("Product with barcode {} already exists", stored.barcode),
            ));
        }
        records.push(record);
        debug!(barcode = %stored.barcode, total = records.len(), "Stored product");
        Ok(ApiResponse::new(201, stored))
    }

    async fn update(&self, barcode: &str, product: &Product) -> CatalogResult<ApiResponse<Product>> {
        self.check_reachable()?;
        let mut record = ProductSchemaAdapter::to_backend(product)?;
        // Path barcode is the identity; the body cannot move a record.
        record.barcode = Some(barcode.to_string());
        let stored = Self::validate_record(&record)?;

        let mut records = self.records.write().await;
        let slot = records
            .iter_mut()
            .find(|r| Self::matches(r, barcode))
            .ok_or_else(|| Self::not_found(barcode))?;
        *slot = record;
        Ok(ApiResponse::new(200, stored))
    }

    async fn delete(&self, barcode: &str) -> CatalogResult<ApiResponse<String>> {
        self.check_reachable()?;
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| !Self::matches(r, barcode));
        if records.len() == before {
            return Err(Self::not_found(barcode));
        }
        Ok(ApiResponse::new(200, "Product deleted successfully".to_string()))
    }

    async fn filter_by_price_range(&self, range: PriceRange) -> CatalogResult<ApiResponse<Vec<Product>>> {
        self.check_reachable()?;
        let records = self.records.read().await;
        let products = records
            .iter()
            .filter(|r| range.contains(r.price.unwrap_or(0)))
            .map(Self::adapt)
            .collect::<CatalogResult<Vec<_>>>()?;
        Ok(ApiResponse::new(200, products))
    }

    async fn sorted_names_by_price(&self) -> CatalogResult<ApiResponse<Vec<String>>> {
        self.check_reachable()?;
        let records = self.records.read().await;
        let mut by_price: Vec<&WireProduct> = records.iter().collect();
        // Stable: equal prices keep insertion order.
        by_price.sort_by_key(|r| r.price.unwrap_or(0));
        let names = by_price
            .into_iter()
            .map(|r| r.item.clone().unwrap_or_default())
            .collect();
        Ok(ApiResponse::new(200, names))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sorted_names_ascending_and_stable() {
        let api = InMemoryProductApi::with_records(vec![
            WireProduct::new("1", "B", "C", 500, 0, 1),
            WireProduct::new("2", "A", "C", 100, 0, 1),
            WireProduct::new("3", "C", "C", 500, 0, 0),
        ]);
        let names = api.sorted_names_by_price().await.unwrap().into_data();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_filter_is_inclusive() {
        let api = InMemoryProductApi::seeded();
        let range = PriceRange::new(890, 1580).unwrap();
        let products = api.filter_by_price_range(range).await.unwrap().into_data();
        let mut barcodes: Vec<_> = products.iter().map(|p| p.barcode.as_str()).collect();
        barcodes.sort_unstable();
        assert_eq!(barcodes, ["74002423", "74005123", "74007890"]);
    }

    #[tokio::test]
    async fn test_duplicate_create_is_rejected() {
        let api = InMemoryProductApi::seeded();
        let dup = Product::new("74001755", "Copy", "Outerwear", 1, 0, true);
        let err = api.create(&dup).await.unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(api.len().await, 9);
    }

    #[tokio::test]
    async fn test_missing_barcode_answers_404() {
        let api = InMemoryProductApi::new();
        let err = api.get_by_barcode("nope").await.unwrap_err();
        assert_eq!(err, CatalogError::api(404, "Product not found with barcode: nope"));
        assert!(api.delete("nope").await.is_err());
    }

    #[tokio::test]
    async fn test_unreachable_fails_every_call() {
        let api = InMemoryProductApi::seeded();
        api.set_unreachable(true);
        assert_eq!(api.list().await.unwrap_err(), CatalogError::network("Network Error"));
        api.set_unreachable(false);
        assert_eq!(api.list().await.unwrap().data.len(), 9);
    }
}
