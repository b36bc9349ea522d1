//! Threat feed aggregator
//!
//! Fetches indicator lists from public threat feeds, normalizes them, ranks
//! the most reported indicators and exports JSON and CSV reports.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Instrument;

mod collectors;
mod console;
mod export;
mod models;
mod pipeline;
mod summary;
mod telemetry;

use collectors::http::{HttpFeedFetcher, DEFAULT_TIMEOUT_SECS};
use collectors::registry::FeedRegistry;
use export::{DEFAULT_CSV_OUTPUT, DEFAULT_JSON_OUTPUT};
use pipeline::RunConfig;
use summary::DEFAULT_TOP_N;
use telemetry::LogFormat;

/// Threat feed aggregator
#[derive(Parser, Debug)]
#[command(name = "threatfeed")]
#[command(about = "Aggregate, rank and export indicators from public threat feeds")]
struct Args {
    /// JSON report path
    #[arg(long, env = "THREATFEED_JSON_OUTPUT", default_value = DEFAULT_JSON_OUTPUT)]
    json_output: PathBuf,

    /// CSV report path
    #[arg(long, env = "THREATFEED_CSV_OUTPUT", default_value = DEFAULT_CSV_OUTPUT)]
    csv_output: PathBuf,

    /// Per-feed request timeout in seconds
    #[arg(long, env = "THREATFEED_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Number of indicators in the console ranking
    #[arg(long, env = "THREATFEED_TOP", default_value_t = DEFAULT_TOP_N)]
    top: usize,

    /// JSON file with a list of {"name", "url"} feeds replacing the built-in ones
    #[arg(long, env = "THREATFEED_FEEDS_FILE")]
    feeds_file: Option<PathBuf>,

    /// Maximum number of feeds fetched at once
    #[arg(long, env = "THREATFEED_CONCURRENCY", default_value_t = 1)]
    concurrency: usize,

    /// Log output format
    #[arg(long, env = "THREATFEED_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Write a Prometheus text-format metrics snapshot here after the run
    #[arg(long, env = "THREATFEED_METRICS_FILE")]
    metrics_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Parse arguments
    let args = Args::parse();

    telemetry::init_tracing(args.log_format);

    let metrics_handle = match args.metrics_file {
        Some(_) => Some(telemetry::install_metrics_recorder()?),
        None => None,
    };

    let registry = match &args.feeds_file {
        Some(path) => FeedRegistry::from_json_file(path)
            .await
            .context("Failed to load feed registry")?,
        None => FeedRegistry::builtin(),
    };

    let config = RunConfig {
        registry,
        json_output: args.json_output,
        csv_output: args.csv_output,
        timeout: Duration::from_secs(args.timeout_secs),
        top_n: args.top,
        concurrency: args.concurrency,
    };

    let fetcher = HttpFeedFetcher::new(config.timeout).context("Failed to create HTTP client")?;

    println!("{}", console::STARTING_LINE);

    let run_id = uuid::Uuid::new_v4();
    let outcome = pipeline::run(&config, fetcher)
        .instrument(tracing::info_span!("run", %run_id))
        .await?;

    for feed in &outcome.aggregation.feeds {
        tracing::debug!(
            %run_id,
            feed = %feed.source,
            lines = feed.raw_lines,
            indicators = feed.indicators,
            error = ?feed.error,
            "Feed result"
        );
    }
    tracing::debug!(%run_id, ranked = outcome.summary.len(), "Summary ranked");

    if let (Some(handle), Some(path)) = (&metrics_handle, &args.metrics_file) {
        telemetry::write_metrics(handle, path).await?;
    }

    Ok(())
}
