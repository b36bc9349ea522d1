//! Frequency ranking of aggregated indicators

use std::collections::HashMap;
use std::io;

use crate::console;
use crate::models::{IndicatorRecord, SummaryEntry};

pub const DEFAULT_TOP_N: usize = 10;

/// Count occurrences per indicator in first-seen order
pub fn count_indicators(records: &[IndicatorRecord]) -> Vec<SummaryEntry> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<SummaryEntry> = vec![];

    for record in records {
        match positions.get(record.indicator.as_str()) {
            Some(&idx) => counts[idx].count += 1,
            None => {
                positions.insert(&record.indicator, counts.len());
                counts.push(SummaryEntry {
                    indicator: record.indicator.clone(),
                    count: 1,
                });
            }
        }
    }

    counts
}

/// The `n` most reported indicators. Ties keep first-seen order.
pub fn summarize(records: &[IndicatorRecord], n: usize) -> Vec<SummaryEntry> {
    let mut counts = count_indicators(records);
    // sort_by is stable
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(n);
    counts
}

/// Print the ranking to the operator console
pub fn print_summary(summary: &[SummaryEntry], n: usize) -> io::Result<()> {
    console::write_summary(&mut io::stdout().lock(), summary, n)
}
