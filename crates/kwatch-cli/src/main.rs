#![forbid(unsafe_code)]

//! `kwatch`: watch a set of applied cluster resources until they satisfy a
//! completion policy.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use kwatch_core::{StopReason, WatchSession};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod inventory;
mod printers;
mod replay;

use crate::config::{FileConfig, Overrides};
use crate::replay::ReplaySource;

#[derive(Debug, Parser)]
#[command(name = "kwatch", version, about = "Watch resource status until it converges")]
struct Cli {
    /// Log filter (env-filter syntax). Logs go to stderr.
    #[arg(long, global = true, default_value = "info")]
    log: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print status events for every resource in the inventory until the
    /// completion policy is met
    Status(StatusArgs),
}

#[derive(Debug, Args)]
struct StatusArgs {
    /// Inventory file listing the resources to watch. Read from stdin when
    /// omitted or `-`.
    inventory: Option<PathBuf>,

    /// Recorded status events (newline-delimited JSON) to replay.
    #[arg(long)]
    replay: PathBuf,

    /// Polling period for resource statuses, e.g. 500ms, 2s. [default: 2s]
    #[arg(long)]
    poll_period: Option<String>,

    /// When to stop polling: known, current, deleted or forever. [default: known]
    #[arg(long)]
    poll_until: Option<String>,

    /// Output format: events, json or table. [default: events]
    #[arg(long)]
    output: Option<String>,

    /// How long to wait before exiting; 0 waits indefinitely. [default: 0]
    #[arg(long)]
    timeout: Option<String>,

    /// Config file. Defaults to ~/.config/kwatch/kwatch.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl StatusArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            poll_period: self.poll_period.clone(),
            poll_until: self.poll_until.clone(),
            output: self.output.clone(),
            timeout: self.timeout.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::new(&cli.log))
        .init();

    match cli.cmd {
        Command::Status(args) => run_status(args, Box::new(std::io::stdout())).await,
    }
}

async fn run_status(args: StatusArgs, mut out: Box<dyn Write + Send>) -> Result<()> {
    let file = match &args.config {
        Some(path) => FileConfig::load_from(&shellexpand_path(path))?,
        None => FileConfig::load_default()?,
    };
    let settings = file.resolve(args.overrides())?;

    let watch_set = inventory::load(args.inventory.as_deref())?;
    if watch_set.is_empty() {
        writeln!(out, "no resources found in the inventory")?;
        return Ok(());
    }

    let mut printer = printers::create_printer(settings.output, out);
    let source = ReplaySource::new(shellexpand_path(&args.replay));
    let session = WatchSession::new(watch_set, settings.watch);

    let signal = session.signal();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() && signal.trigger(StopReason::Interrupted) {
            info!("interrupt received, stopping watch");
        }
    });

    let outcome = session.run(&source, printer.as_mut()).await?;
    for e in &outcome.sink_errors {
        warn!(error = %e, "output error");
    }
    Ok(())
}

fn shellexpand_path(path: &std::path::Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}
