//! Report exporters

pub mod csv;
pub mod json;

use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::{IndicatorRecord, ReportIndicator};

pub const DEFAULT_JSON_OUTPUT: &str = "threats_report.json";
pub const DEFAULT_CSV_OUTPUT: &str = "threats_report.csv";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize JSON report to {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write CSV report to {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: ::csv::Error,
    },
}

/// Group records by indicator, first-seen order, keeping every source
/// occurrence (duplicates included)
pub fn group_sources(records: &[IndicatorRecord]) -> Vec<ReportIndicator> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut grouped: Vec<ReportIndicator> = vec![];

    for record in records {
        match positions.get(record.indicator.as_str()) {
            Some(&idx) => grouped[idx].sources.push(record.source.clone()),
            None => {
                positions.insert(&record.indicator, grouped.len());
                grouped.push(ReportIndicator {
                    indicator: record.indicator.clone(),
                    sources: vec![record.source.clone()],
                });
            }
        }
    }

    grouped
}
