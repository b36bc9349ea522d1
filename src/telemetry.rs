//! Logging and metrics setup

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "threatfeed=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Install the global tracing subscriber. Logs go to stderr so stdout
/// carries only the operator report.
pub fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_FILTER.into());

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

/// Install a Prometheus recorder so counters emitted during the run can be
/// rendered afterwards
pub fn install_metrics_recorder() -> Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")
}

/// Write the current metrics snapshot in Prometheus text format
pub async fn write_metrics(handle: &PrometheusHandle, path: &Path) -> Result<()> {
    tokio::fs::write(path, handle.render())
        .await
        .with_context(|| format!("Failed to write metrics to {}", path.display()))?;

    tracing::info!(path = %path.display(), "Metrics snapshot written");
    Ok(())
}
