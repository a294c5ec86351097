//! Product store state and its reducer
//!
//! `ProductState::reduce` is the only code that changes the state. It is a
//! plain synchronous function so every transition can be tested without a
//! runtime.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::actions::ProductAction;
use crate::domain::product::Product;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductState {
    /// Authoritative collection, in server order
    pub products: Vec<Product>,
    /// Snapshot from the last successful price filter
    pub filtered_products: Vec<Product>,
    /// Snapshot from the last successful price sort
    pub sorted_product_names: Vec<String>,
    /// Product last fetched by barcode, created or updated
    pub current_product: Option<Product>,
    pub loading: bool,
    pub error: Option<String>,
}

impl ProductState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reduce(&mut self, action: ProductAction) {
        match action {
            ProductAction::Pending(_) => {
                self.loading = true;
                self.error = None;
            }
            ProductAction::Rejected { message, .. } => {
                self.loading = false;
                self.error = Some(message);
            }
            ProductAction::FetchAllFulfilled(products) => {
                self.loading = false;
                self.products = products;
            }
            ProductAction::FetchByBarcodeFulfilled(product) => {
                self.loading = false;
                self.current_product = Some(product);
            }
            ProductAction::CreateFulfilled(product) => {
                self.loading = false;
                self.products.push(product.clone());
                self.current_product = Some(product);
            }
            ProductAction::UpdateFulfilled(product) => {
                self.loading = false;
                if let Some(slot) = self.products.iter_mut().find(|p| p.barcode == product.barcode) {
                    *slot = product.clone();
                } else {
                    debug!(barcode = %product.barcode, "Updated product is not in the collection; not appending");
                }
                self.current_product = Some(product);
            }
            ProductAction::DeleteFulfilled(barcode) => {
                self.loading = false;
                self.products.retain(|p| p.barcode != barcode);
                self.filtered_products.retain(|p| p.barcode != barcode);
                self.current_product = None;
            }
            ProductAction::FilterByPriceFulfilled(products) => {
                self.loading = false;
                self.filtered_products = products;
            }
            ProductAction::SortByPriceFulfilled(names) => {
                self.loading = false;
                self.sorted_product_names = names;
            }
            ProductAction::ClearFilteredProducts => self.filtered_products.clear(),
            ProductAction::ClearCurrentProduct => self.current_product = None,
        }
    }
}
