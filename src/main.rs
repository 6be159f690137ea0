use anyhow::Result;
use clap::Parser;
use deid_dates::{pipeline, ScanConfig, DEFAULT_OFFSET};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "deid-dates")]
#[command(about = "Locate date spans in clinical note archives for de-identification")]
#[command(version)]
struct Args {
    /// Note archive delimited by start_of_record / END_OF_RECORD markers
    input: PathBuf,

    /// Report file to create (truncated if it exists)
    output: PathBuf,

    /// Calibration offset subtracted from every span position
    #[arg(long, default_value_t = DEFAULT_OFFSET, allow_negative_numbers = true)]
    offset: i64,

    /// Suppress the per-match diagnostic trace on stdout
    #[arg(long)]
    no_trace: bool,

    /// Write a JSON run summary to this path
    #[arg(long)]
    stats_out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // WHY: stdout carries the diagnostic trace, so structured logs go to stderr
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let args = Args::parse();
    info!(?args, "Parsed CLI arguments");

    let config = ScanConfig {
        offset: args.offset,
        trace: !args.no_trace,
        ..Default::default()
    };

    let stats = pipeline::run(&args.input, &args.output, &config).await?;

    if let Some(stats_path) = &args.stats_out {
        stats.save(stats_path).await?;
        info!("Wrote run stats to {}", stats_path.display());
    }

    Ok(())
}
