//! Revision list command handler (the default command).

use anyhow::{Context, Result};
use jlog_core::config::Config;
use tracing::debug;

use crate::cli::LogArgs;
use crate::modes;

pub fn run(config: &Config, args: &LogArgs) -> Result<()> {
    let config = apply_overrides(config, args)?;
    let source = config.jj_log(args.repository.clone());
    debug!(args = ?source.args(), batch_size = config.batch_size, "starting revision list");

    modes::run_revision_log(&config, source).context("revision list failed")
}

/// Command-line values win over the config file.
fn apply_overrides(config: &Config, args: &LogArgs) -> Result<Config> {
    let mut config = config.clone();
    if let Some(revset) = &args.revset {
        config.revset = Some(revset.clone());
    }
    if let Some(limit) = args.limit {
        config.limit = Some(limit);
    }
    if let Some(batch_size) = args.batch_size {
        if batch_size == 0 {
            anyhow::bail!("--batch-size must be at least 1");
        }
        config.batch_size = batch_size;
    }
    Ok(config)
}
