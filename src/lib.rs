//! Product Catalog - client for a product-catalog REST API
//!
//! Holds the canonical product collection in a store driven by async actions,
//! translates between the API's wire records and canonical products, and
//! exposes both through a command-line front end.

// Module declarations
pub mod application;
pub mod commands;
pub mod domain;
pub mod infrastructure;

use clap::Parser;
use std::process::ExitCode;

pub use application::{ProductState, ProductStore};
pub use domain::{CatalogError, CatalogResult, PriceRange, Product, ProductApi, WireProduct};

/// Parse arguments, run one command on a multi-threaded runtime and map the
/// outcome to a process exit code
pub fn run() -> ExitCode {
    let cli = commands::Cli::parse();

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut stdout = std::io::stdout().lock();
    match runtime.block_on(commands::execute(cli, &mut stdout)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
