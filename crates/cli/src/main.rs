//! Trace-driven driver for the SMS prefetch engine.
//!
//! This binary replays a memory-access trace through one engine instance. It performs:
//! 1. **Configuration:** Optional JSON engine config; omitted fields take their defaults.
//! 2. **Replay:** Each trace event drives the engine, then a bounded fetch queue retires requests.
//! 3. **Reporting:** Engine statistics plus useful/late prefetch counts, as text or JSON.

mod error;
mod replay;
mod trace;

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use smsim_core::SmsConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::CliError;
use crate::replay::Replay;

#[derive(Parser, Debug)]
#[command(
    name = "smsim",
    author,
    version,
    about = "Spatial Memory Streaming prefetcher trace replay",
    long_about = "Replay a memory-access trace through the SMS prefetcher and report what it learned and issued.\n\nTrace lines are `A <pc> <addr>` (access) or `E <pc> <addr>` (generation end), numbers in decimal or 0x-hex; `#` starts a comment.\n\nExamples:\n  smsim traces/stream.trace\n  smsim --config sms.json --queue-depth 16 --drain 2 traces/stream.trace\n  gen-trace | smsim --json -"
)]
struct Cli {
    /// Trace file to replay; `-` reads standard input.
    trace: PathBuf,

    /// JSON engine configuration.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Depth of the modelled fetch queue.
    #[arg(long, default_value_t = 8)]
    queue_depth: usize,

    /// Requests the memory system retires after each trace event.
    #[arg(long, default_value_t = 1)]
    drain: usize,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Installs a stderr subscriber filtered by `RUST_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Loads the configuration, replays the trace, and prints the report.
fn run(cli: &Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(CliError::io(path.display().to_string()))?;
            SmsConfig::from_json(&text)?
        }
        None => SmsConfig::default(),
    };
    info!(
        queue_depth = cli.queue_depth,
        drain = cli.drain,
        "configuration loaded"
    );

    let mut replay = Replay::new(&config, cli.queue_depth, cli.drain)?;
    if cli.trace == Path::new("-") {
        replay.run(io::stdin().lock(), "<stdin>")?;
    } else {
        let name = cli.trace.display().to_string();
        let file = File::open(&cli.trace).map_err(CliError::io(name.as_str()))?;
        replay.run(BufReader::new(file), &name)?;
    }

    let report = replay.finish();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print();
    }
    Ok(())
}
