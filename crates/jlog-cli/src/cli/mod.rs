//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use jlog_core::config;

mod commands;
mod logging;

use logging::LogTarget;

#[derive(Parser)]
#[command(name = "jlog")]
#[command(version)]
#[command(about = "Browse the jj revision graph in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    log_args: LogArgs,

    /// Write logs to stderr instead of the log file
    #[arg(long, global = true)]
    log_stderr: bool,
}

/// Options for the `jj log` invocation; override config values.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct LogArgs {
    /// Revset to show (default: config, then jj's own default)
    #[arg(short = 'r', long)]
    pub revset: Option<String>,

    /// Maximum number of revisions to show
    #[arg(short = 'n', long, value_name = "N")]
    pub limit: Option<usize>,

    /// Revisions loaded per batch
    #[arg(long, value_name = "N")]
    pub batch_size: Option<usize>,

    /// Path to the jj repository (default: current directory)
    #[arg(short = 'R', long, value_name = "PATH", env = "JLOG_REPOSITORY")]
    pub repository: Option<PathBuf>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Summarize captured `jj log --color always` output, one line per revision
    Render {
        /// Read from a file instead of stdin
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let target = if cli.log_stderr {
        LogTarget::Stderr
    } else if cli.command.is_none() {
        LogTarget::File
    } else {
        LogTarget::Off
    };
    let _log_guard = logging::init(target).context("init logging")?;

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli) })
}

fn dispatch(cli: Cli) -> Result<()> {
    let config = config::Config::load().context("load config")?;

    let Cli {
        command, log_args, ..
    } = cli;

    // default to the revision list
    let Some(command) = command else {
        return commands::log::run(&config, &log_args);
    };

    match command {
        Commands::Render { file } => commands::render::run(file.as_deref()),
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}
