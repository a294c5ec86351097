//! Infrastructure layer for the catalog API, configuration and logging
//!
//! HTTP transport, schema adaptation, the REST and in-memory `ProductApi`
//! implementations, plus the ambient config/session/logging plumbing.

pub mod config; // Layered configuration and defaults
pub mod http_client;
pub mod in_memory_product_api; // Offline backend, also used by tests
pub mod logging;
pub mod product_schema_adapter; // Wire <-> canonical product translation
pub mod rest_product_api;
pub mod session_store;

// Re-export commonly used items
pub use config::{ApiConfig, AppConfig, ConfigManager, LoggingConfig};
pub use http_client::{HttpClient, HttpClientConfig, HttpResponse};
pub use in_memory_product_api::InMemoryProductApi;
pub use logging::{get_log_directory, init_logging_with_config};
pub use product_schema_adapter::ProductSchemaAdapter;
pub use rest_product_api::RestProductApi;
pub use session_store::{Session, SessionStore};
