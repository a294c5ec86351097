//! Domain module - catalog entities, value objects and the backend port
//!
//! Each module is its own file in the domain/ directory; commonly used items
//! are re-exported here.

pub mod errors;
pub mod price_range;
pub mod product;
pub mod repositories;
pub mod seed;
pub mod wire_product;

pub use errors::{CatalogError, CatalogResult};
pub use price_range::PriceRange;
pub use product::{calculate_final_price, PricedProduct, Product};
pub use repositories::{ApiResponse, ProductApi};
pub use wire_product::WireProduct;
