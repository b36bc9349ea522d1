//! End-to-end run: fetch, normalize, aggregate, summarize, export

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;

use crate::collectors::registry::FeedRegistry;
use crate::collectors::{Aggregation, Aggregator, FeedFetcher};
use crate::collectors::http::DEFAULT_TIMEOUT_SECS;
use crate::export::{self, DEFAULT_CSV_OUTPUT, DEFAULT_JSON_OUTPUT};
use crate::models::SummaryEntry;
use crate::summary::{self, DEFAULT_TOP_N};

/// Immutable settings for one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub registry: FeedRegistry,
    pub json_output: PathBuf,
    pub csv_output: PathBuf,
    pub timeout: Duration,
    pub top_n: usize,
    pub concurrency: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            registry: FeedRegistry::builtin(),
            json_output: PathBuf::from(DEFAULT_JSON_OUTPUT),
            csv_output: PathBuf::from(DEFAULT_CSV_OUTPUT),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            top_n: DEFAULT_TOP_N,
            concurrency: 1,
        }
    }
}

/// What a run produced
#[derive(Debug)]
pub struct RunOutcome {
    pub aggregation: Aggregation,
    pub summary: Vec<SummaryEntry>,
}

/// Run the whole pipeline against the given fetcher. Feed failures are
/// absorbed; export failures are returned.
pub async fn run<F: FeedFetcher>(config: &RunConfig, fetcher: F) -> Result<RunOutcome> {
    tracing::info!(feeds = config.registry.len(), "Aggregating feeds");
    let aggregation = Aggregator::new(fetcher)
        .with_concurrency(config.concurrency)
        .aggregate(&config.registry)
        .await;

    let summary = summary::summarize(&aggregation.records, config.top_n);
    summary::print_summary(&summary, config.top_n).context("Failed to print summary")?;

    // Timestamp marks when the report is written, after all feeds were fetched
    let report = export::json::export_json(&aggregation.records, &config.json_output, Utc::now())
        .context("JSON export failed")?;
    metrics::gauge!("threatfeed_distinct_indicators").set(report.indicators.len() as f64);

    export::csv::export_csv(&aggregation.records, &config.csv_output)
        .context("CSV export failed")?;

    tracing::info!(
        records = aggregation.records.len(),
        distinct = report.indicators.len(),
        failed_feeds = aggregation.failed_feeds().count(),
        "Run complete"
    );

    Ok(RunOutcome {
        aggregation,
        summary,
    })
}
