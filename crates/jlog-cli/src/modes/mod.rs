//! Runtime execution modes.
//!
//! - `tui`: full-screen revision list (optional feature)

#[cfg(feature = "tui")]
pub use jlog_tui::run_revision_log;

#[cfg(not(feature = "tui"))]
pub fn run_revision_log(
    _config: &jlog_core::config::Config,
    _source: jlog_core::jj::JjLog,
) -> anyhow::Result<()> {
    anyhow::bail!("TUI support is disabled in this build (feature \"tui\").");
}
