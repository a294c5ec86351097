//! Product store: state container plus the asynchronous catalog operations
//!
//! Every operation dispatches `Pending`, awaits the backend once, then
//! dispatches `Fulfilled` or `Rejected`. Reducers run under the write lock, so
//! concurrent operations never interleave on the state; whichever settles
//! last wins.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::application::actions::{Operation, ProductAction, StoreEvent};
use crate::application::state::ProductState;
use crate::domain::errors::{CatalogError, CatalogResult};
use crate::domain::price_range::PriceRange;
use crate::domain::product::Product;
use crate::domain::repositories::{ApiResponse, ProductApi};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Shared product store. Cheap to clone; clones share state, backend and subscribers.
#[derive(Clone)]
pub struct ProductStore {
    state: Arc<RwLock<ProductState>>,
    api: Arc<dyn ProductApi>,
    events: broadcast::Sender<StoreEvent>,
}

impl ProductStore {
    pub fn new(api: Arc<dyn ProductApi>) -> Self {
        Self::with_state(api, ProductState::default())
    }

    pub fn with_state(api: Arc<dyn ProductApi>, initial: ProductState) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: Arc::new(RwLock::new(initial)),
            api,
            events,
        }
    }

    /// Receive a `StoreEvent` for every action applied from now on
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Snapshot of the current state
    pub async fn state(&self) -> ProductState {
        self.state.read().await.clone()
    }

    /// Run a selector against the current state without cloning it
    pub async fn select<T>(&self, selector: impl FnOnce(&ProductState) -> T) -> T {
        let state = self.state.read().await;
        selector(&state)
    }

    pub async fn dispatch(&self, action: ProductAction) {
        self.apply(action, None).await;
    }

    async fn apply(&self, action: ProductAction, request_id: Option<Uuid>) {
        let event = StoreEvent::for_action(&action, request_id);
        let mut state = self.state.write().await;
        state.reduce(action);
        // Sent under the lock so subscribers see events in reducer order.
        if self.events.send(event).is_err() {
            debug!("No store subscribers");
        }
    }

    async fn run_thunk<T, Fut>(
        &self,
        operation: Operation,
        call: Fut,
        fulfilled: impl FnOnce(T) -> ProductAction,
    ) -> CatalogResult<T>
    where
        T: Clone,
        Fut: Future<Output = CatalogResult<T>>,
    {
        let request_id = Uuid::new_v4();
        self.apply(ProductAction::Pending(operation), Some(request_id)).await;

        match call.await {
            Ok(data) => {
                self.apply(fulfilled(data.clone()), Some(request_id)).await;
                info!(%operation, %request_id, "Operation fulfilled");
                Ok(data)
            }
            Err(err) => {
                let message = err
                    .server_message()
                    .or_else(|| operation.fallback_message().map(str::to_string))
                    .unwrap_or_else(|| err.to_string());
                warn!(%operation, %request_id, error = %err, "Operation rejected");
                self.apply(ProductAction::Rejected { operation, message }, Some(request_id))
                    .await;
                Err(err)
            }
        }
    }

    /// Replace the collection with the server's list
    pub async fn fetch_all(&self) -> CatalogResult<Vec<Product>> {
        let api = Arc::clone(&self.api);
        self.run_thunk(
            Operation::FetchAll,
            async move { api.list().await.map(ApiResponse::into_data) },
            ProductAction::FetchAllFulfilled,
        )
        .await
    }

    /// Load one product into `current_product`
    pub async fn fetch_by_barcode(&self, barcode: &str) -> CatalogResult<Product> {
        let api = Arc::clone(&self.api);
        let barcode = barcode.to_string();
        self.run_thunk(
            Operation::FetchByBarcode,
            async move { api.get_by_barcode(&barcode).await.map(ApiResponse::into_data) },
            ProductAction::FetchByBarcodeFulfilled,
        )
        .await
    }

    /// Validate, create on the server and append the stored record
    pub async fn create(&self, product: Product) -> CatalogResult<Product> {
        let api = Arc::clone(&self.api);
        self.run_thunk(
            Operation::Create,
            async move {
                product.validate()?;
                api.create(&product).await.map(ApiResponse::into_data)
            },
            ProductAction::CreateFulfilled,
        )
        .await
    }

    /// Validate and update the product stored under `barcode`.
    ///
    /// The barcode is immutable: an empty barcode in `product` takes the path
    /// value, a different one is rejected.
    pub async fn update(&self, barcode: &str, mut product: Product) -> CatalogResult<Product> {
        let api = Arc::clone(&self.api);
        let barcode = barcode.to_string();
        self.run_thunk(
            Operation::Update,
            async move {
                if product.barcode.is_empty() {
                    product.barcode.clone_from(&barcode);
                } else if product.barcode != barcode {
                    return Err(CatalogError::validation("barcode", "Product barcode cannot be changed"));
                }
                product.validate()?;
                api.update(&barcode, &product).await.map(ApiResponse::into_data)
            },
            ProductAction::UpdateFulfilled,
        )
        .await
    }

    /// Delete on the server, then drop the barcode from the collection and the filtered view
    pub async fn delete(&self, barcode: &str) -> CatalogResult<String> {
        let api = Arc::clone(&self.api);
        let barcode = barcode.to_string();
        self.run_thunk(
            Operation::Delete,
            async move {
                let response = api.delete(&barcode).await?;
                debug!(%barcode, acknowledgement = %response.data, "Delete acknowledged");
                Ok(barcode)
            },
            ProductAction::DeleteFulfilled,
        )
        .await
    }

    /// Populate the filtered view with products priced within `min..=max`.
    /// An invalid range is rejected without contacting the server.
    pub async fn filter_by_price_range(&self, min: i64, max: i64) -> CatalogResult<Vec<Product>> {
        let api = Arc::clone(&self.api);
        self.run_thunk(
            Operation::FilterByPrice,
            async move {
                let range = PriceRange::new(min, max)?;
                api.filter_by_price_range(range).await.map(ApiResponse::into_data)
            },
            ProductAction::FilterByPriceFulfilled,
        )
        .await
    }

    pub async fn sorted_names_by_price(&self) -> CatalogResult<Vec<String>> {
        let api = Arc::clone(&self.api);
        self.run_thunk(
            Operation::SortByPrice,
            async move { api.sorted_names_by_price().await.map(ApiResponse::into_data) },
            ProductAction::SortByPriceFulfilled,
        )
        .await
    }

    pub async fn clear_filtered_products(&self) {
        self.dispatch(ProductAction::ClearFilteredProducts).await;
    }

    pub async fn clear_current_product(&self) {
        self.dispatch(ProductAction::ClearCurrentProduct).await;
    }
}
