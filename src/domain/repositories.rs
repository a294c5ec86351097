//! Backend port for the product catalog
//!
//! The store talks to the catalog only through this trait. The REST client in
//! `infrastructure` is the production implementation; the in-memory one backs
//! tests and offline runs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::CatalogResult;
use crate::domain::price_range::PriceRange;
use crate::domain::product::Product;

/// Uniform response envelope: HTTP status plus adapted payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub const fn new(status: u16, data: T) -> Self {
        Self { status, data }
    }

    pub fn into_data(self) -> T {
        self.data
    }
}

#[async_trait]
pub trait ProductApi: Send + Sync {
    async fn list(&self) -> CatalogResult<ApiResponse<Vec<Product>>>;
    async fn get_by_barcode(&self, barcode: &str) -> CatalogResult<ApiResponse<Product>>;
    async fn create(&self, product: &Product) -> CatalogResult<ApiResponse<Product>>;
    async fn update(&self, barcode: &str, product: &Product) -> CatalogResult<ApiResponse<Product>>;
    /// Body of a delete is informational only (empty or a text acknowledgement)
    async fn delete(&self, barcode: &str) -> CatalogResult<ApiResponse<String>>;
    async fn filter_by_price_range(&self, range: PriceRange) -> CatalogResult<ApiResponse<Vec<Product>>>;
    /// Display names only, ascending by price, in the server's stable order
    async fn sorted_names_by_price(&self) -> CatalogResult<ApiResponse<Vec<String>>>;
}
