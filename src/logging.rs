//! # Structured Logging Module
//!
//! Console logging for every run, plus an optional JSON log file per process
//! for inspecting long generation runs after the fact.

use std::fs;
use std::io::{self, IsTerminal};
use std::process;
use std::sync::OnceLock;

use chrono::Local;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Initialize structured logging from configuration.
///
/// `RUST_LOG` takes precedence over `config.level`. Only the first call has an
/// effect; later calls (and calls after another global subscriber was set) are
/// ignored.
pub fn init_structured_logging(config: &LoggingConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = || {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
        };

        // Stdout carries the run report
        let console = if config.json {
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_level(true)
                .json()
                .with_filter(filter())
                .boxed()
        } else {
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_level(true)
                .with_ansi(io::stderr().is_terminal())
                .with_filter(filter())
                .boxed()
        };

        let mut log_path = None;
        let file_layer = config.log_dir.as_ref().and_then(|log_dir| {
            if let Err(e) = fs::create_dir_all(log_dir) {
                eprintln!("Failed to create log directory {}: {e}", log_dir.display());
                return None;
            }

            let pid = process::id();
            let timestamp = Local::now().format("%Y%m%d_%H%M%S");
            let log_filename = format!("batch-generator.{pid}.{timestamp}.log");
            log_path = Some(log_dir.join(&log_filename));

            let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
            let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
            let _ = FILE_GUARD.set(guard);

            Some(
                fmt::layer()
                    .with_writer(file_writer)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_level(true)
                    .with_ansi(false)
                    .json()
                    .with_filter(filter()),
            )
        });

        if tracing_subscriber::registry()
            .with(console)
            .with(file_layer)
            .try_init()
            .is_err()
        {
            tracing::debug!("Global tracing subscriber already initialized, keeping it");
            return;
        }

        tracing::debug!(
            pid = process::id(),
            log_file = ?log_path,
            "Structured logging initialized"
        );
    });
}

/// Log level name for a CLI verbosity count, falling back to `base`.
pub fn level_for_verbosity(base: &str, verbose: u8) -> String {
    match verbose {
        0 => base.to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}
