//! ---
//! engage_section: "05-logging"
//! engage_subsection: "module"
//! engage_type: "source"
//! engage_scope: "code"
//! engage_description: "Subscriber installation with stdout and rolling file sinks."
//! engage_version: "v0.0.0-prealpha"
//! engage_owner: "tbd"
//! ---
use std::path::PathBuf;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::daily;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

/// Filter directive variable consulted before `RUST_LOG`.
pub const LOG_ENV: &str = "ENGAGE_LOG";

const DEFAULT_DIRECTIVE: &str = "info";

static FILE_GUARD: OnceCell<WorkerGuard> = OnceCell::new();
static CONSOLE_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

/// Console output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LogFormat {
    #[default]
    StructuredJson,
    Pretty,
}

/// Stream receiving console output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ConsoleTarget {
    #[default]
    Stdout,
    Stderr,
}

/// Where and how logs are written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_directory")]
    pub directory: PathBuf,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default)]
    pub console: ConsoleTarget,
    /// File name prefix, defaulting to the service name.
    #[serde(default)]
    pub file_prefix: Option<String>,
}

fn default_logging_directory() -> PathBuf {
    PathBuf::from("target/logs")
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_logging_directory(),
            format: LogFormat::default(),
            console: ConsoleTarget::default(),
            file_prefix: None,
        }
    }
}

impl LoggingConfig {
    /// File name the daily appender rotates, before its date suffix.
    pub fn file_name(&self, service_name: &str) -> String {
        let prefix = self.file_prefix.as_deref().unwrap_or(service_name);
        format!("{prefix}-{service_name}.log")
    }
}

fn env_filter() -> EnvFilter {
    match std::env::var(LOG_ENV) {
        Ok(directive) => EnvFilter::try_new(&directive).unwrap_or_else(|err| {
            eprintln!("invalid {LOG_ENV} directive ({err}); defaulting to {DEFAULT_DIRECTIVE}");
            EnvFilter::new(DEFAULT_DIRECTIVE)
        }),
        Err(_) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE)),
    }
}

/// Install the process-wide subscriber.
///
/// * `ENGAGE_LOG` overrides the filter, then `RUST_LOG`, then `info`.
/// * The console stream (`config.console`) receives structured JSON or
///   pretty text per `config.format`.
/// * A daily rolling JSON file is kept in `config.directory`.
///
/// A second call leaves the first subscriber in place.
pub fn init_tracing(service_name: &str, config: &LoggingConfig) -> Result<()> {
    std::fs::create_dir_all(&config.directory).with_context(|| {
        format!("unable to create log directory {}", config.directory.display())
    })?;

    let file_appender = daily(&config.directory, config.file_name(service_name));
    let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);
    let (console_writer, console_guard) = match config.console {
        ConsoleTarget::Stdout => tracing_appender::non_blocking(std::io::stdout()),
        ConsoleTarget::Stderr => tracing_appender::non_blocking(std::io::stderr()),
    };

    let _ = FILE_GUARD.set(file_guard);
    let _ = CONSOLE_GUARD.set(console_guard);

    let console_layer = match config.format {
        LogFormat::StructuredJson => fmt::layer()
            .with_target(false)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .json()
            .with_writer(console_writer)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_writer(console_writer)
            .boxed(),
    };

    let file_layer = fmt::layer()
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .json()
        .with_writer(file_writer)
        .boxed();

    tracing_subscriber::registry()
        .with(env_filter())
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .ok();

    info!(
        service = %service_name,
        log_dir = %config.directory.display(),
        format = ?config.format,
        "tracing initialised"
    );
    Ok(())
}
