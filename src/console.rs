//! Operator-facing console lines

use std::fmt::Display;
use std::io::{self, Write};
use std::path::Path;

use crate::models::SummaryEntry;

pub const STARTING_LINE: &str = "[*] Starting Threat Intelligence Feed Aggregator...";

pub fn fetched_line(entries: usize, feed: &str) -> String {
    format!("[+] Fetched {} entries from {}", entries, feed)
}

pub fn fetch_failed_line(feed: &str, reason: &impl Display) -> String {
    format!("[-] Failed to fetch {}: {}", feed, reason)
}

pub fn exported_line(path: &Path) -> String {
    format!("[+] Exported indicators to {}", path.display())
}

/// Write the top-N ranking, preceded by a blank line
pub fn write_summary<W: Write>(out: &mut W, summary: &[SummaryEntry], n: usize) -> io::Result<()> {
    writeln!(out, "\nTop {} Indicators:", n)?;
    for entry in summary {
        writeln!(out, " - {} ({} sources)", entry.indicator, entry.count)?;
    }
    Ok(())
}
