//! Configuration infrastructure
//!
//! Configuration is resolved in three layers:
//! 1. Built-in defaults (`defaults` module)
//! 2. JSON file in the user config directory, created on first run
//! 3. Environment overrides with the `PRODUCT_CATALOG__` prefix,
//!    e.g. `PRODUCT_CATALOG__API__BASE_URL=http://catalog:8080`

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Catalog API connection settings
    pub api: ApiConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Catalog API connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL the REST paths are joined onto
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// Client-side request budget; 0 disables rate limiting
    pub max_requests_per_second: u32,

    /// User agent string
    pub user_agent: String,

    /// Static bearer token; takes precedence over a stored session token
    pub auth_token: Option<String>,
}

/// Logging configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs
    pub json_format: bool,

    /// Enable console output (stderr, so command output stays clean)
    pub console_output: bool,

    /// Enable daily-rolling file output
    pub file_output: bool,

    /// Directory for log files; defaults to the app data dir
    pub log_directory: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::API_BASE_URL.to_string(),
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            max_requests_per_second: defaults::MAX_REQUESTS_PER_SECOND,
            user_agent: defaults::USER_AGENT.to_string(),
            auth_token: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: false,
            console_output: true,
            file_output: false,
            log_directory: None,
        }
    }
}

impl AppConfig {
    /// Layer environment overrides on top of this configuration.
    ///
    /// `env_source` replaces the process environment when given, which keeps
    /// tests independent of the real environment.
    pub fn with_env_overrides(&self, env_source: Option<config::Map<String, String>>) -> Result<Self> {
        let environment = config::Environment::with_prefix(defaults::ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .source(env_source);

        let settings = config::Config::builder()
            .add_source(config::Config::try_from(self).context("Failed to serialize base configuration")?)
            .add_source(environment)
            .build()
            .context("Failed to build layered configuration")?;

        let merged: Self = settings
            .try_deserialize()
            .context("Failed to deserialize layered configuration")?;
        merged.validate()?;
        Ok(merged)
    }

    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.api.base_url)
            .with_context(|| format!("Invalid API base URL: {}", self.api.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("API base URL must use http or https, got {}", url.scheme());
        }
        if self.api.timeout_seconds == 0 {
            bail!("timeout_seconds must be greater than 0");
        }
        if self.logging.level.trim().is_empty() {
            bail!("logging.level must not be empty");
        }
        Ok(())
    }
}

/// Configuration manager for loading and saving the config file
pub struct ConfigManager {
    pub config_path: PathBuf,
}

impl ConfigManager {
    /// Get the application configuration directory
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get user config directory")?
            .join(defaults::APP_DIR_NAME);

        Ok(config_dir)
    }

    /// Get application data directory (logs, session token)
    pub fn get_app_data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .context("Failed to get user data directory")?
            .join(defaults::APP_DIR_NAME);

        Ok(data_dir)
    }

    /// Create a configuration manager for the default location
    pub fn new() -> Result<Self> {
        let config_path = Self::get_config_dir()?.join(defaults::CONFIG_FILE_NAME);
        Ok(Self { config_path })
    }

    /// Create a configuration manager for an explicit file
    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    /// Load configuration from file, creating default if it doesn't exist
    pub async fn load_config(&self) -> Result<AppConfig> {
        if !self.config_path.exists() {
            info!("Configuration file not found, creating default: {:?}", self.config_path);
            let default_config = AppConfig::default();
            self.save_config(&default_config).await?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(&self.config_path)
            .await
            .context("Failed to read configuration file")?;

        match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => {
                info!("Loaded configuration from: {:?}", self.config_path);
                Ok(config)
            }
            Err(parse_error) => {
                warn!("Configuration file is corrupted: {}", parse_error);

                let backup_path = self.config_path.with_extension("json.corrupted");
                if let Err(e) = fs::copy(&self.config_path, &backup_path).await {
                    warn!("Failed to create backup of corrupted config: {}", e);
                } else {
                    info!("Backed up corrupted config to: {:?}", backup_path);
                }

                self.reset_to_defaults().await
            }
        }
    }

    /// File configuration with environment overrides applied
    pub async fn load_effective_config(&self) -> Result<AppConfig> {
        let file_config = self.load_config().await?;
        file_config.with_env_overrides(None)
    }

    /// Save configuration to file
    pub async fn save_config(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;

        fs::write(&self.config_path, content)
            .await
            .context("Failed to write configuration file")?;

        info!("Saved configuration to: {:?}", self.config_path);
        Ok(())
    }

    /// Reset configuration to defaults
    pub async fn reset_to_defaults(&self) -> Result<AppConfig> {
        info!("Resetting configuration to defaults");
        let default_config = AppConfig::default();
        self.save_config(&default_config)
            .await
            .context("Failed to save default configuration")?;
        Ok(default_config)
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

/// Default values
pub mod defaults {
    /// Catalog API served by the backing product service
    pub const API_BASE_URL: &str = "http://localhost:8080";

    /// Request timeout in seconds
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;

    /// Client-side request budget
    pub const MAX_REQUESTS_PER_SECOND: u32 = 10;

    pub const USER_AGENT: &str = concat!("product-catalog/", env!("CARGO_PKG_VERSION"));

    pub const LOG_LEVEL: &str = "info";

    /// Prefix for environment overrides
    pub const ENV_PREFIX: &str = "PRODUCT_CATALOG";

    pub const APP_DIR_NAME: &str = "product-catalog";

    pub const CONFIG_FILE_NAME: &str = "product_catalog_config.json";

    pub const SESSION_FILE_NAME: &str = "session.json";
}
