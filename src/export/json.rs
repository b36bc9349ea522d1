//! JSON report exporter

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::console;
use crate::export::{group_sources, ExportError};
use crate::models::{IndicatorRecord, ThreatReport};

/// Build the grouped report for a set of records
pub fn build_report(records: &[IndicatorRecord], timestamp: DateTime<Utc>) -> ThreatReport {
    ThreatReport {
        timestamp,
        indicators: group_sources(records),
    }
}

/// Write the report as pretty-printed JSON, replacing any existing file
pub fn export_json(
    records: &[IndicatorRecord],
    path: &Path,
    timestamp: DateTime<Utc>,
) -> Result<ThreatReport, ExportError> {
    let report = build_report(records, timestamp);

    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &report).map_err(|source| ExportError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(io_err)?;

    println!("{}", console::exported_line(path));
    tracing::info!(
        path = %path.display(),
        indicators = report.indicators.len(),
        "JSON report written"
    );

    Ok(report)
}
