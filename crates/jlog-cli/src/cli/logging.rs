//! Tracing setup.
//!
//! The revision list owns the terminal, so interactive runs log to
//! `${JLOG_HOME}/logs/jlog.log`. Other commands stay silent unless
//! `--log-stderr` is given. The filter comes from `JLOG_LOG` (default `info`).

use std::fs;
use std::io;

use anyhow::{Context, Result};
use jlog_core::config::paths;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{Builder, Rotation};
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "jlog.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    File,
    Stderr,
    Off,
}

/// Installs the global subscriber. Keep the returned guard alive until exit
/// so buffered file output is flushed.
///
/// # Errors
/// Returns an error if the log directory or file cannot be created.
pub fn init(target: LogTarget) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_env("JLOG_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    match target {
        LogTarget::File => {
            let dir = paths::log_dir();
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = Builder::new()
                .rotation(Rotation::NEVER)
                .filename_prefix(LOG_FILE)
                .build(&dir)
                .with_context(|| format!("Failed to open log file in {}", dir.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(writer)
                .try_init();
            Ok(Some(guard))
        }
        LogTarget::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .try_init();
            Ok(None)
        }
        LogTarget::Off => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::sink)
                .try_init();
            Ok(None)
        }
    }
}
