mod cmd_snapshot;
mod cmd_watch;
mod fmt;
#[cfg(feature = "tui")]
mod tui;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use tidewatch_feed::FeedConfig;

#[derive(Parser)]
#[command(
    name = "tidewatch",
    version,
    about = "Live dashboard for the carbon-capture agent event feed"
)]
struct Cli {
    /// JSON config file (base_url, drain_path, poll_interval_ms, limit)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Backend base URL (overrides config and TIDEWATCH_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Poll interval in milliseconds
    #[arg(long, global = true)]
    interval_ms: Option<u64>,
    /// Maximum events requested per drain
    #[arg(long, global = true)]
    limit: Option<usize>,
    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Poll the backend and show the live dashboard
    Watch {
        /// Print events as text lines instead of the interactive UI
        #[arg(long)]
        plain: bool,
    },
    /// Drain once and print the current views
    Snapshot {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The interactive UI owns the terminal; logs only go to a file there.
    let interactive = matches!(cli.cmd, Command::Watch { plain: false }) && cfg!(feature = "tui");
    init_tracing(cli.verbose, cli.log_file.as_deref(), !interactive)?;

    let mut config = FeedConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.base_url {
        config.base_url = url;
    }
    if let Some(ms) = cli.interval_ms {
        config.poll_interval_ms = ms;
    }
    if let Some(limit) = cli.limit {
        config.limit = limit;
    }
    config.validate()?;
    tracing::debug!(?config, "resolved feed config");

    match cli.cmd {
        Command::Watch { plain } => cmd_watch::execute(&config, plain),
        Command::Snapshot { json } => cmd_snapshot::execute(&config, json),
    }
}

fn init_tracing(verbose: bool, log_file: Option<&Path>, stderr: bool) -> anyhow::Result<()> {
    let log_level = if verbose { "debug" } else { "info" };
    let filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level))
    };

    if let Some(path) = log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if stderr {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}
