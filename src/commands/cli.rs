//! Command-line surface

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

const AFTER_HELP: &str = "\
Prices are in minor currency units (cents).

Environment:
  PRODUCT_CATALOG__API__BASE_URL   Catalog API base URL
  PRODUCT_CATALOG__API__AUTH_TOKEN Static bearer token
  RUST_LOG                         Log filter override";

#[derive(Debug, Parser)]
#[command(name = "product-catalog", version)]
#[command(about = "List, filter, sort and edit products in the catalog")]
#[command(after_help = AFTER_HELP)]
pub struct Cli {
    /// Catalog API base URL (overrides configuration)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Run against an in-process catalog seeded with the initial products
    #[arg(long, global = true, default_value_t = false)]
    pub offline: bool,

    /// Configuration file to use instead of the default location
    #[arg(long, global = true, env = "PRODUCT_CATALOG_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all products
    List {
        /// Only products marked available
        #[arg(long, default_value_t = false)]
        available: bool,
    },
    /// Show one product
    Get { barcode: String },
    /// Create a product
    Create(CreateArgs),
    /// Update fields of an existing product; omitted fields keep their value
    Update {
        barcode: String,
        #[command(flatten)]
        changes: UpdateArgs,
    },
    /// Delete a product
    Delete { barcode: String },
    /// Products priced within an inclusive range
    Filter {
        #[arg(long)]
        min: Option<i64>,
        #[arg(long)]
        max: Option<i64>,
    },
    /// Product names in ascending price order
    Sorted,
    /// Create any missing products from the initial catalog
    Seed,
    /// Store a bearer token for later requests
    Login {
        #[arg(long, env = "PRODUCT_CATALOG_TOKEN")]
        token: String,
    },
    /// Remove the stored bearer token
    Logout,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub barcode: String,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub category: String,
    #[arg(long)]
    pub price: i64,
    #[arg(long, default_value_t = 0)]
    pub discount: i64,
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub available: bool,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub price: Option<i64>,
    #[arg(long)]
    pub discount: Option<i64>,
    #[arg(long, action = ArgAction::Set)]
    pub available: Option<bool>,
}

impl UpdateArgs {
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.discount.is_none()
            && self.available.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_update_with_partial_fields() {
        let cli = Cli::try_parse_from(["product-catalog", "update", "74001755", "--price", "3000", "--json"]).unwrap();
        assert!(cli.json);
        let Command::Update { barcode, changes } = cli.command else {
            panic!("expected update");
        };
        assert_eq!(barcode, "74001755");
        assert_eq!(changes.price, Some(3000));
        assert!(changes.name.is_none());
        assert!(!changes.is_empty());
    }

    #[test]
    fn test_parse_create_defaults() {
        let cli = Cli::try_parse_from([
            "product-catalog", "create", "--barcode", "1", "--name", "Hat", "--category", "Accessories", "--price", "999",
        ])
        .unwrap();
        let Command::Create(args) = cli.command else {
            panic!("expected create");
        };
        assert_eq!(args.discount, 0);
        assert!(args.available);
    }

    #[test]
    fn test_parse_filter_open_bound() {
        let cli = Cli::try_parse_from(["product-catalog", "--offline", "filter", "--min", "1000"]).unwrap();
        assert!(cli.offline);
        assert!(matches!(cli.command, Command::Filter { min: Some(1000), max: None }));
    }
}
