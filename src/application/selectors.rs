//! Read-only views over a `ProductState`

use crate::application::state::ProductState;
use crate::domain::product::Product;

pub fn select_products(state: &ProductState) -> &[Product] {
    &state.products
}

/// First product in the collection with this barcode
pub fn select_product_by_barcode<'a>(state: &'a ProductState, barcode: &str) -> Option<&'a Product> {
    state.products.iter().find(|p| p.barcode == barcode)
}

pub fn select_product_count(state: &ProductState) -> usize {
    state.products.len()
}

pub fn select_filtered_products(state: &ProductState) -> &[Product] {
    &state.filtered_products
}

pub fn select_sorted_product_names(state: &ProductState) -> &[String] {
    &state.sorted_product_names
}

pub const fn select_current_product(state: &ProductState) -> Option<&Product> {
    state.current_product.as_ref()
}

pub const fn select_loading(state: &ProductState) -> bool {
    state.loading
}

pub fn select_error(state: &ProductState) -> Option<&str> {
    state.error.as_deref()
}

/// Products currently marked available, in collection order
pub fn select_available_products(state: &ProductState) -> impl Iterator<Item = &Product> {
    state.products.iter().filter(|p| p.available)
}
