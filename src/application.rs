//! Application layer module
//!
//! The product store and the actions, reducer and selectors it is built from.

pub mod actions;
pub mod product_store;
pub mod selectors;
pub mod state;

pub use actions::{Operation, Phase, ProductAction, StoreEvent};
pub use product_store::ProductStore;
pub use state::ProductState;
