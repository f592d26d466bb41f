//! # MC Runtime
//!
//! Serves one bincode-encoded build request. Reads from `--input` or stdin
//! and writes to `--output` or stdout. Logs go to stderr.

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use mc_runtime::{build_handler, serve_once, RuntimeConfig};
use mc_telemetry::{init_telemetry, TelemetryConfig};

/// Gateway mconfig builder
#[derive(Parser, Debug)]
#[command(name = "mc-runtime")]
#[command(about = "Build subsystem configs for one gateway from an encoded request")]
struct Args {
    /// Encoded request file (default: stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Encoded response file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Orchestrator version tag (overrides VERSION_TAG)
    #[arg(long)]
    version_tag: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_telemetry(&TelemetryConfig::from_env()).context("Failed to initialize logging")?;

    let config = RuntimeConfig::resolve_from_env(args.version_tag);
    info!(version_tag = %config.version_tag, "starting mconfig build");
    let handler = build_handler(&config);

    let reader: Box<dyn io::Read> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let writer: Box<dyn io::Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    let written = serve_once(&handler, reader, writer).context("Failed to serve build request")?;
    info!(bytes = written, "response written");
    Ok(())
}
