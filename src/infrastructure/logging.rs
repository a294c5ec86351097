//! Logging system configuration and initialization
//!
//! - Console output on stderr so rendered command output on stdout stays clean
//! - Optional daily-rolling file output, plain or JSON
//! - `RUST_LOG` overrides the configured level
//!
//! ```bash
//! # Show HTTP client internals
//! RUST_LOG="debug,reqwest=debug,hyper=debug" product-catalog list
//! ```

use anyhow::{Context, Result, anyhow};
use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, info};
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::infrastructure::config::ConfigManager;
pub use crate::infrastructure::config::LoggingConfig;

const LOG_FILE_PREFIX: &str = "product-catalog.log";

// Keeps the non-blocking file writers alive for the life of the process
static LOG_GUARDS: Lazy<Mutex<Vec<WorkerGuard>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Local wall-clock timestamps with milliseconds
struct LocalTimeFormatter;

impl FormatTime for LocalTimeFormatter {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Directory log files are written to: the configured one, else `<app data>/logs`
pub fn get_log_directory(config: &LoggingConfig) -> PathBuf {
    config.log_directory.clone().unwrap_or_else(|| {
        ConfigManager::get_app_data_dir()
            .unwrap_or_else(|_| std::env::temp_dir().join(crate::infrastructure::config::defaults::APP_DIR_NAME))
            .join("logs")
    })
}

/// Filter for the configured level with chatty dependencies held back unless
/// tracing everything
pub fn build_env_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut filter = EnvFilter::try_new(level).with_context(|| format!("Invalid log level: {level}"))?;
    if !level.to_lowercase().contains("trace") {
        for directive in ["reqwest=info", "hyper=warn", "hyper_util=warn", "h2=warn"] {
            filter = filter.add_directive(directive.parse().context("Invalid filter directive")?);
        }
    }
    Ok(filter)
}

/// Initialize logging with custom configuration.
///
/// Safe to call more than once; a second call leaves the first subscriber in
/// place, opens no log file and returns `Ok`.
pub fn init_logging_with_config(config: &LoggingConfig) -> Result<()> {
    if !config.console_output && !config.file_output {
        return Err(anyhow!("No logging output configured"));
    }
    if tracing::dispatcher::has_been_set() {
        debug!("Global subscriber already set; keeping it");
        return Ok(());
    }

    let env_filter = build_env_filter(&config.level)?;

    let console_layer = config.console_output.then(|| {
        fmt::Layer::new()
            .with_writer(std::io::stderr)
            .with_timer(LocalTimeFormatter)
            .with_target(false)
    });

    let mut log_dir = None;
    let mut file_guard = None;
    let file_layer = if config.file_output {
        let dir = get_log_directory(config);
        std::fs::create_dir_all(&dir).with_context(|| format!("Failed to create log directory {}", dir.display()))?;

        let (file_writer, guard) = non_blocking(rolling::daily(&dir, LOG_FILE_PREFIX));
        file_guard = Some(guard);
        log_dir = Some(dir);

        let layer = if config.json_format {
            fmt::Layer::new()
                .json()
                .with_writer(file_writer)
                .with_timer(LocalTimeFormatter)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false)
                .boxed()
        } else {
            fmt::Layer::new()
                .with_writer(file_writer)
                .with_timer(LocalTimeFormatter)
                .with_target(false)
                .with_ansi(false)
                .boxed()
        };
        Some(layer)
    } else {
        None
    };

    let initialized = Registry::default()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .is_ok();

    // A guard whose subscriber lost the race is dropped here, stopping its writer
    if initialized {
        if let Some(guard) = file_guard {
            LOG_GUARDS
                .lock()
                .map_err(|_| anyhow!("Log guard store is poisoned"))?
                .push(guard);
        }
        debug!(
            level = %config.level,
            json_format = config.json_format,
            console_output = config.console_output,
            log_dir = ?log_dir,
            "Logging system initialized"
        );
    }
    Ok(())
}

/// Log system information for diagnostics
pub fn log_system_info() {
    info!(
        version = env!("CARGO_PKG_VERSION"),
        os = std::env::consts::OS,
        arch = std::env::consts::ARCH,
        "Product catalog client starting"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(config.console_output);
        assert!(!config.file_output);
    }

    #[test]
    fn test_configured_log_directory_wins() {
        let dir = tempdir().unwrap();
        let config = LoggingConfig {
            log_directory: Some(dir.path().to_path_buf()),
            ..LoggingConfig::default()
        };
        assert_eq!(get_log_directory(&config), dir.path());
    }

    #[test]
    fn test_no_output_is_an_error() {
        let config = LoggingConfig {
            console_output: false,
            file_output: false,
            ..LoggingConfig::default()
        };
        assert!(init_logging_with_config(&config).is_err());
    }

    fn guard_count() -> usize {
        LOG_GUARDS.lock().unwrap().len()
    }

    #[test]
    fn test_repeat_init_does_not_fail() {
        let dir = tempdir().unwrap();
        let config = LoggingConfig {
            file_output: true,
            console_output: false,
            json_format: true,
            log_directory: Some(dir.path().join("logs")),
            ..LoggingConfig::default()
        };
        assert!(init_logging_with_config(&config).is_ok());
        assert!(init_logging_with_config(&config).is_ok());
        assert!(guard_count() <= 1);
    }

    #[test]
    fn test_repeat_init_keeps_no_extra_file_writer() {
        // Whichever call wins, a subscriber is set after this one
        init_logging_with_config(&LoggingConfig::default()).unwrap();

        let dir = tempdir().unwrap();
        let config = LoggingConfig {
            file_output: true,
            log_directory: Some(dir.path().join("late")),
            ..LoggingConfig::default()
        };
        init_logging_with_config(&config).unwrap();

        assert!(guard_count() <= 1);
        assert!(!dir.path().join("late").exists());
    }
}
