//! Error types for catalog operations
//!
//! One taxonomy shared by the schema adapter, the REST client and the store:
//! validation and adaptation failures are raised before or after I/O, network
//! and API failures come from the transport.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A product (or request argument) failed a field rule before any I/O.
    #[error("{message}")]
    Validation { field: String, message: String },

    /// A payload could not be turned into the canonical product shape.
    #[error("Adaptation failed: {reason}")]
    Adaptation { reason: String },

    /// The request never produced a response.
    #[error("{message}")]
    Network { message: String },

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn adaptation(reason: impl Into<String>) -> Self {
        Self::Adaptation {
            reason: reason.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Check if retrying the same request could succeed
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Api { status, .. } => *status >= 500 || *status == 429,
            Self::Validation { .. } | Self::Adaptation { .. } => false,
        }
    }

    /// HTTP status carried by the error, if the server answered at all
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Human-readable message suitable for the store's error slot.
    ///
    /// Returns `None` when the error carries no usable text so the caller can
    /// fall back to a per-operation message.
    pub fn server_message(&self) -> Option<String> {
        let message = match self {
            Self::Validation { message, .. } | Self::Network { message } | Self::Api { message, .. } => message,
            Self::Adaptation { reason } => reason,
        };
        let trimmed = message.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::api(status.as_u16(), err.to_string());
        }
        if err.is_decode() {
            return Self::adaptation(err.to_string());
        }
        if err.is_timeout() {
            return Self::network(format!("Request timed out: {err}"));
        }
        Self::network(err.to_string())
    }
}
