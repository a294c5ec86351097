//! Command-line front end
//!
//! - Each command module is its own file in the commands/ directory
//! - `execute` resolves configuration, builds the backend and the store, and
//!   runs one command

pub mod cli;
pub mod product_commands;
pub mod render;
pub mod session_commands;

use anyhow::{Context, Result};
use std::io::Write;
use std::sync::Arc;
use tracing::debug;

use crate::application::product_store::ProductStore;
use crate::domain::repositories::ProductApi;
use crate::infrastructure::config::{AppConfig, ConfigManager};
use crate::infrastructure::http_client::{HttpClient, HttpClientConfig};
use crate::infrastructure::in_memory_product_api::InMemoryProductApi;
use crate::infrastructure::logging::{init_logging_with_config, log_system_info};
use crate::infrastructure::rest_product_api::RestProductApi;
use crate::infrastructure::session_store::SessionStore;

pub use cli::{Cli, Command};
use render::OutputFormat;

/// Effective configuration: file, then environment, then command-line flags
pub async fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    let mut config = manager.load_effective_config().await?;

    if let Some(api_url) = &cli.api_url {
        config.api.base_url.clone_from(api_url);
    }
    if let Some(level) = &cli.log_level {
        config.logging.level.clone_from(level);
    }
    config.validate().context("Invalid command-line overrides")?;
    Ok(config)
}

/// Backend for product commands: the REST API, or the seeded in-process catalog when offline
pub async fn build_backend(cli: &Cli, config: &AppConfig, sessions: &SessionStore) -> Result<Arc<dyn ProductApi>> {
    if cli.offline {
        debug!("Using in-process catalog");
        return Ok(Arc::new(InMemoryProductApi::seeded()));
    }
    let session_token = sessions.token().await?;
    let http = HttpClient::new(HttpClientConfig::from_api_config(&config.api, session_token))?;
    Ok(Arc::new(RestProductApi::new(http)))
}

pub async fn execute<W: Write>(cli: Cli, out: &mut W) -> Result<()> {
    let config = resolve_config(&cli).await?;
    init_logging_with_config(&config.logging)?;
    log_system_info();

    let format = OutputFormat::from_json_flag(cli.json);
    let sessions = SessionStore::new()?;

    match &cli.command {
        Command::Login { token } => return session_commands::login(&sessions, out, format, token).await,
        Command::Logout => return session_commands::logout(&sessions, out, format).await,
        _ => {}
    }

    let store = ProductStore::new(build_backend(&cli, &config, &sessions).await?);
    run_product_command(&store, cli.command, out, format).await
}

/// Run a product command against an existing store
pub async fn run_product_command<W: Write>(
    store: &ProductStore,
    command: Command,
    out: &mut W,
    format: OutputFormat,
) -> Result<()> {
    match command {
        Command::List { available } => product_commands::list_products(store, out, format, available).await,
        Command::Get { barcode } => product_commands::get_product(store, out, format, &barcode).await,
        Command::Create(args) => product_commands::create_product(store, out, format, args).await,
        Command::Update { barcode, changes } => {
            product_commands::update_product(store, out, format, &barcode, changes).await
        }
        Command::Delete { barcode } => product_commands::delete_product(store, out, format, &barcode).await,
        Command::Filter { min, max } => product_commands::filter_products(store, out, format, min, max).await,
        Command::Sorted => product_commands::sorted_names(store, out, format).await,
        Command::Seed => product_commands::seed_products(store, out, format).await,
        Command::Login { .. } | Command::Logout => {
            anyhow::bail!("Session commands do not use the product store")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_cli_overrides_win_over_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        let cli = Cli::try_parse_from([
            "product-catalog",
            "--config",
            config_path.to_str().unwrap(),
            "--api-url",
            "http://catalog.test:9090",
            "--log-level",
            "debug",
            "sorted",
        ])
        .unwrap();

        let config = resolve_config(&cli).await.unwrap();
        assert_eq!(config.api.base_url, "http://catalog.test:9090");
        assert_eq!(config.logging.level, "debug");
    }

    #[tokio::test]
    async fn test_offline_sorted_names() {
        let store = ProductStore::new(Arc::new(InMemoryProductApi::seeded()));
        let mut out = Vec::new();
        run_product_command(&store, Command::Sorted, &mut out, OutputFormat::Json)
            .await
            .unwrap();
        let names: Vec<String> = serde_json::from_slice(&out).unwrap();
        assert_eq!(names.first().map(String::as_str), Some("Cotton T-Shirt"));
        assert_eq!(names.last().map(String::as_str), Some("Winter Coat"));
        assert_eq!(names.len(), 9);
    }
}
