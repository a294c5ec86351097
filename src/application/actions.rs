//! Store actions and the events broadcast when they are applied
//!
//! Each asynchronous operation goes through `pending` and then exactly one of
//! `fulfilled` or `rejected`. The two clear operations are synchronous and are
//! applied in a single step.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::product::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    FetchAll,
    FetchByBarcode,
    Create,
    Update,
    Delete,
    FilterByPrice,
    SortByPrice,
    ClearFilteredProducts,
    ClearCurrentProduct,
}

impl Operation {
    /// Action type, `products/<operation>`
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::FetchAll => "products/fetchAll",
            Self::FetchByBarcode => "products/fetchByBarcode",
            Self::Create => "products/create",
            Self::Update => "products/update",
            Self::Delete => "products/delete",
            Self::FilterByPrice => "products/filterByPrice",
            Self::SortByPrice => "products/sortByPrice",
            Self::ClearFilteredProducts => "products/clearFilteredProducts",
            Self::ClearCurrentProduct => "products/clearCurrentProduct",
        }
    }

    /// Message stored on rejection when the error carries no text of its own.
    /// `None` for the clear reducers, which apply synchronously and never reject.
    pub const fn fallback_message(self) -> Option<&'static str> {
        match self {
            Self::FetchAll => Some("Failed to fetch products"),
            Self::FetchByBarcode => Some("Failed to fetch product"),
            Self::Create => Some("Failed to create product"),
            Self::Update => Some("Failed to update product"),
            Self::Delete => Some("Failed to delete product"),
            Self::FilterByPrice => Some("Failed to filter products"),
            Self::SortByPrice => Some("Failed to sort products"),
            Self::ClearFilteredProducts | Self::ClearCurrentProduct => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Pending,
    Fulfilled,
    Rejected,
    /// Synchronous action, applied in one step
    Applied,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductAction {
    Pending(Operation),
    FetchAllFulfilled(Vec<Product>),
    FetchByBarcodeFulfilled(Product),
    CreateFulfilled(Product),
    UpdateFulfilled(Product),
    /// Carries the barcode that was deleted
    DeleteFulfilled(String),
    FilterByPriceFulfilled(Vec<Product>),
    SortByPriceFulfilled(Vec<String>),
    Rejected { operation: Operation, message: String },
    ClearFilteredProducts,
    ClearCurrentProduct,
}

impl ProductAction {
    pub const fn operation(&self) -> Operation {
        match self {
            Self::Pending(operation) | Self::Rejected { operation, .. } => *operation,
            Self::FetchAllFulfilled(_) => Operation::FetchAll,
            Self::FetchByBarcodeFulfilled(_) => Operation::FetchByBarcode,
            Self::CreateFulfilled(_) => Operation::Create,
            Self::UpdateFulfilled(_) => Operation::Update,
            Self::DeleteFulfilled(_) => Operation::Delete,
            Self::FilterByPriceFulfilled(_) => Operation::FilterByPrice,
            Self::SortByPriceFulfilled(_) => Operation::SortByPrice,
            Self::ClearFilteredProducts => Operation::ClearFilteredProducts,
            Self::ClearCurrentProduct => Operation::ClearCurrentProduct,
        }
    }

    pub const fn phase(&self) -> Phase {
        match self {
            Self::Pending(_) => Phase::Pending,
            Self::Rejected { .. } => Phase::Rejected,
            Self::ClearFilteredProducts | Self::ClearCurrentProduct => Phase::Applied,
            _ => Phase::Fulfilled,
        }
    }
}

/// Broadcast to subscribers after an action has been applied to the state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreEvent {
    pub operation: Operation,
    pub phase: Phase,
    /// Shared by the pending and settling events of one async call
    pub request_id: Option<Uuid>,
    /// Rejection message, when `phase` is `Rejected`
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl StoreEvent {
    pub fn for_action(action: &ProductAction, request_id: Option<Uuid>) -> Self {
        let error = match action {
            ProductAction::Rejected { message, .. } => Some(message.clone()),
            _ => None,
        };
        Self {
            operation: action.operation(),
            phase: action.phase(),
            request_id,
            error,
            timestamp: Utc::now(),
        }
    }

    /// `products/<operation>/<phase>`
    pub fn action_type(&self) -> String {
        match self.phase {
            Phase::Applied => self.operation.type_name().to_string(),
            Phase::Pending => format!("{}/pending", self.operation),
            Phase::Fulfilled => format!("{}/fulfilled", self.operation),
            Phase::Rejected => format!("{}/rejected", self.operation),
        }
    }
}
