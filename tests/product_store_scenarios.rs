//! Store lifecycle scenarios: pending/fulfilled/rejected transitions, mutation
//! rules and completion-ordered concurrency
use async_trait::async_trait;
use product_catalog_lib::application::{Operation, Phase, ProductStore};
use product_catalog_lib::domain::repositories::{ApiResponse, ProductApi};
use product_catalog_lib::infrastructure::InMemoryProductApi;
use product_catalog_lib::{CatalogError, CatalogResult, PriceRange, Product};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, oneshot};

/// Delegates to the in-memory catalog, except that updates wait for a gate
/// keyed by the product name and list can be switched to a blank failure.
struct GatedApi {
    inner: InMemoryProductApi,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    fail_blank: AtomicBool,
}

impl GatedApi {
    fn seeded() -> Self {
        Self {
            inner: InMemoryProductApi::seeded(),
            gates: Mutex::new(HashMap::new()),
            fail_blank: AtomicBool::new(false),
        }
    }

    async fn gate(&self, name: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().await.insert(name.to_string(), rx);
        tx
    }
}

#[async_trait]
impl ProductApi for GatedApi {
    async fn list(&self) -> CatalogResult<ApiResponse<Vec<Product>>> {
        if self.fail_blank.load(Ordering::SeqCst) {
            return Err(CatalogError::network(""));
        }
        self.inner.list().await
    }

    async fn get_by_barcode(&self, barcode: &str) -> CatalogResult<ApiResponse<Product>> {
        self.inner.get_by_barcode(barcode).await
    }

    async fn create(&self, product: &Product) -> CatalogResult<ApiResponse<Product>> {
        self.inner.create(product).await
    }

    async fn update(&self, barcode: &str, product: &Product) -> CatalogResult<ApiResponse<Product>> {
        let gate = self.gates.lock().await.remove(&product.name);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.inner.update(barcode, product).await
    }

    async fn delete(&self, barcode: &str) -> CatalogResult<ApiResponse<String>> {
        self.inner.delete(barcode).await
    }

    async fn filter_by_price_range(&self, range: PriceRange) -> CatalogResult<ApiResponse<Vec<Product>>> {
        self.inner.filter_by_price_range(range).await
    }

    async fn sorted_names_by_price(&self) -> CatalogResult<ApiResponse<Vec<String>>> {
        self.inner.sorted_names_by_price().await
    }
}

fn gown(name: &str) -> Product {
    Product::new("74001755", name, "Full Body Outfits", 3548, 7, true)
}

async fn current_name(store: &ProductStore, barcode: &str) -> Option<String> {
    store
        .select(|s| s.products.iter().find(|p| p.barcode == barcode).map(|p| p.name.clone()))
        .await
}

#[tokio::test]
async fn fetch_all_replaces_collection() {
    let api = Arc::new(InMemoryProductApi::seeded());
    let store = ProductStore::new(api.clone());

    store.fetch_all().await.unwrap();
    assert_eq!(store.state().await.products.len(), 9);

    api.delete("74001755").await.unwrap();
    store.fetch_all().await.unwrap();
    let state = store.state().await;
    assert_eq!(state.products.len(), 8);
    assert!(!state.loading);
    assert!(state.error.is_none());
}

#[tokio::test]
async fn update_replaces_in_place_and_sets_current() {
    let store = ProductStore::new(Arc::new(InMemoryProductApi::seeded()));
    store.fetch_all().await.unwrap();
    let before: Vec<String> = store.state().await.products.iter().map(|p| p.barcode.clone()).collect();

    store.update("74001755", gown("Evening Gown")).await.unwrap();

    let state = store.state().await;
    let after: Vec<String> = state.products.iter().map(|p| p.barcode.clone()).collect();
    assert_eq!(before, after);
    assert_eq!(state.products[0].name, "Evening Gown");
    assert_eq!(state.current_product.map(|p| p.name), Some("Evening Gown".to_string()));
}

#[tokio::test]
async fn update_of_unloaded_product_is_not_appended() {
    let store = ProductStore::new(Arc::new(InMemoryProductApi::seeded()));
    // Collection never fetched: the server knows the product, the store does not.
    store.update("74001755", gown("Evening Gown")).await.unwrap();
    assert!(store.state().await.products.is_empty());
}

#[tokio::test]
async fn delete_removes_from_collection_and_filtered_view() {
    let store = ProductStore::new(Arc::new(InMemoryProductApi::seeded()));
    store.fetch_all().await.unwrap();
    store.filter_by_price_range(800, 1300).await.unwrap();
    assert_eq!(store.state().await.filtered_products.len(), 2);

    store.delete("74002423").await.unwrap();

    let state = store.state().await;
    assert_eq!(state.products.len(), 8);
    assert_eq!(state.filtered_products.len(), 1);
    assert_eq!(state.filtered_products[0].barcode, "74005123");
}

#[tokio::test]
async fn rejected_fetch_keeps_previous_data() {
    let api = Arc::new(InMemoryProductApi::seeded());
    let store = ProductStore::new(api.clone());
    store.fetch_all().await.unwrap();

    api.set_unreachable(true);
    let err = store.fetch_all().await.unwrap_err();
    assert!(err.is_recoverable());

    let state = store.state().await;
    assert_eq!(state.products.len(), 9);
    assert_eq!(state.error.as_deref(), Some("Network Error"));
    assert!(!state.loading);
}

#[tokio::test]
async fn blank_error_falls_back_to_operation_message() {
    let api = Arc::new(GatedApi::seeded());
    api.fail_blank.store(true, Ordering::SeqCst);
    let store = ProductStore::new(api);

    store.fetch_all().await.unwrap_err();
    assert_eq!(store.state().await.error.as_deref(), Some("Failed to fetch products"));
}

#[tokio::test]
async fn duplicate_create_is_rejected_by_server_without_touching_state() {
    let store = ProductStore::new(Arc::new(InMemoryProductApi::seeded()));
    store.fetch_all().await.unwrap();

    store.create(gown("Copy")).await.unwrap_err();
    let state = store.state().await;
    assert_eq!(state.products.len(), 9);
    assert_eq!(state.error.as_deref(), Some("Product with barcode 74001755 already exists"));
}

#[tokio::test]
async fn pending_clears_previous_error() {
    let store = ProductStore::new(Arc::new(InMemoryProductApi::seeded()));
    store.fetch_by_barcode("nope").await.unwrap_err();
    assert!(store.state().await.error.is_some());

    store.sorted_names_by_price().await.unwrap();
    let state = store.state().await;
    assert!(state.error.is_none());
    assert_eq!(state.sorted_product_names.len(), 9);
}

#[tokio::test]
async fn subscribers_see_every_transition_in_order() {
    let store = ProductStore::new(Arc::new(InMemoryProductApi::seeded()));
    let mut events = store.subscribe();

    store.fetch_all().await.unwrap();
    store.filter_by_price_range(-1, 10).await.unwrap_err();
    store.clear_filtered_products().await;

    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push((event.operation, event.phase));
    }
    assert_eq!(
        seen,
        [
            (Operation::FetchAll, Phase::Pending),
            (Operation::FetchAll, Phase::Fulfilled),
            (Operation::FilterByPrice, Phase::Pending),
            (Operation::FilterByPrice, Phase::Rejected),
            (Operation::ClearFilteredProducts, Phase::Applied),
        ]
    );
}

#[tokio::test]
async fn last_fulfillment_wins_regardless_of_issue_order() {
    let api = Arc::new(GatedApi::seeded());
    let store = ProductStore::new(api.clone());
    store.fetch_all().await.unwrap();

    let release_first = api.gate("First").await;
    let release_second = api.gate("Second").await;

    let first = tokio::spawn({
        let store = store.clone();
        async move { store.update("74001755", gown("First")).await }
    });
    let second = tokio::spawn({
        let store = store.clone();
        async move { store.update("74001755", gown("Second")).await }
    });

    // Second settles before First, so First is the last write.
    release_second.send(()).unwrap();
    second.await.unwrap().unwrap();
    assert_eq!(current_name(&store, "74001755").await.as_deref(), Some("Second"));

    release_first.send(()).unwrap();
    first.await.unwrap().unwrap();
    assert_eq!(current_name(&store, "74001755").await.as_deref(), Some("First"));

    let state = store.state().await;
    assert!(!state.loading);
    assert_eq!(state.current_product.map(|p| p.name), Some("First".to_string()));
}
