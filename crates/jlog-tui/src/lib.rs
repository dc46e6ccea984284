//! Full-screen revision graph viewer for jlog.

pub mod common;
pub mod effects;
pub mod events;
pub mod features;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stdout};

use anyhow::{Context, Result};
use jlog_core::config::Config;
use jlog_core::graph::start_stream;
use jlog_core::jj::JjLog;
pub use runtime::TuiRuntime;
use tracing::info;

use crate::state::AppState;

/// Runs the interactive revision list for `source`.
///
/// Must be called from within a Tokio runtime; the stream worker is spawned
/// onto it while the UI loop runs on the calling thread.
///
/// # Errors
/// Returns an error if stdout is not a terminal, `jj` cannot be started, or
/// terminal I/O fails.
pub fn run_revision_log(config: &Config, source: JjLog) -> Result<()> {
    if !stdout().is_terminal() {
        anyhow::bail!(
            "The revision list requires a terminal.\n\
             Use `jlog render` to summarize captured `jj log` output instead."
        );
    }

    let stream =
        start_stream(source.clone(), config.batch_size).context("Failed to start jj log")?;
    info!(revset = source.revset_label(), "stream started");

    let state = AppState::new(source.revset_label(), config.highlight_lanes);
    let mut runtime = TuiRuntime::new(state, source, config.batch_size, stream)?;
    runtime.run()
}
