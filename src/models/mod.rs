//! Core data models for the feed aggregator

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub mod ioc_utils;

/// A remote feed: a display name and the URL it is fetched from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct FeedDescriptor {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    pub url: String,
}

impl FeedDescriptor {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// One normalized indicator together with the feed that reported it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorRecord {
    pub indicator: String,
    pub source: String,
}

impl IndicatorRecord {
    pub fn new(indicator: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            indicator: indicator.into(),
            source: source.into(),
        }
    }
}

/// Ranked indicator with its occurrence count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryEntry {
    pub indicator: String,
    pub count: usize,
}

/// Per-feed outcome of a run
#[derive(Debug, Clone)]
pub struct FeedResult {
    pub source: String,
    pub raw_lines: usize,
    pub indicators: usize,
    pub error: Option<String>,
}

impl FeedResult {
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// JSON report written at the end of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreatReport {
    pub timestamp: DateTime<Utc>,
    pub indicators: Vec<ReportIndicator>,
}

/// One distinct indicator and every source record that reported it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportIndicator {
    pub indicator: String,
    pub sources: Vec<String>,
}
