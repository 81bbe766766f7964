//! Batch entry point: decide a newline-delimited JSON file of load
//! requests and write one response line per decided load.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use velocity_gate::{in_memory_gate, process_file};

/// Velocity-limit admission over a newline-delimited JSON batch.
#[derive(Parser)]
#[command(name = "velocity-gate", version, about)]
struct Cli {
    /// Input file, one load request per line.
    #[arg(default_value = "input.txt")]
    input: PathBuf,

    /// Output file, one response per decided load.
    #[arg(long, short, default_value = "output.txt")]
    output: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let gate = in_memory_gate();

    match process_file(&gate, &cli.input, &cli.output) {
        Ok(summary) => {
            info!(
                accepted = summary.accepted,
                rejected = summary.rejected,
                skipped = summary.skipped,
                output = %cli.output.display(),
                "batch complete"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, input = %cli.input.display(), "batch run failed");
            ExitCode::FAILURE
        }
    }
}
