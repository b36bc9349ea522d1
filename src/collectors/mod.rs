//! Threat intelligence feed collection

pub mod http;
pub mod registry;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};

use crate::console;
use crate::models::ioc_utils::normalize_indicators;
use crate::models::{FeedDescriptor, FeedResult, IndicatorRecord};
use self::http::FetchError;
use self::registry::FeedRegistry;

/// Trait for feed fetchers
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Fetch the raw lines of a feed
    async fn fetch(&self, feed: &FeedDescriptor) -> Result<Vec<String>, FetchError>;
}

/// Everything collected in one pass over the registry
#[derive(Debug, Default)]
pub struct Aggregation {
    /// Indicator records in registry order, then line order
    pub records: Vec<IndicatorRecord>,
    pub feeds: Vec<FeedResult>,
}

impl Aggregation {
    pub fn failed_feeds(&self) -> impl Iterator<Item = &FeedResult> {
        self.feeds.iter().filter(|f| f.is_failure())
    }
}

/// Runs a fetcher over every feed of a registry and merges the results
pub struct Aggregator<F> {
    fetcher: F,
    concurrency: usize,
}

impl<F: FeedFetcher> Aggregator<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            concurrency: 1,
        }
    }

    /// Allow up to `concurrency` fetches in flight. Results are still merged
    /// in registry order.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Fetch and normalize every feed. A failed feed contributes nothing and
    /// never aborts the run.
    pub async fn aggregate(&self, registry: &FeedRegistry) -> Aggregation {
        let mut aggregation = Aggregation::default();

        let fetches = registry.feeds().iter().map(|feed| async move {
            let outcome = self.fetcher.fetch(feed).await;
            (feed, outcome)
        });
        let mut outcomes = stream::iter(fetches).buffered(self.concurrency);

        while let Some((feed, outcome)) = outcomes.next().await {
            match outcome {
                Ok(lines) => {
                    println!("{}", console::fetched_line(lines.len(), &feed.name));

                    let records = normalize_indicators(&feed.name, &lines);
                    tracing::info!(
                        feed = %feed.name,
                        url = %feed.url,
                        lines = lines.len(),
                        indicators = records.len(),
                        "Feed fetched"
                    );
                    metrics::counter!(
                        "threatfeed_feed_fetches_total",
                        "feed" => feed.name.clone(),
                        "outcome" => "success"
                    )
                    .increment(1);

                    aggregation.feeds.push(FeedResult {
                        source: feed.name.clone(),
                        raw_lines: lines.len(),
                        indicators: records.len(),
                        error: None,
                    });
                    aggregation.records.extend(records);
                }
                Err(e) => {
                    println!("{}", console::fetch_failed_line(&feed.name, &e));

                    tracing::warn!(
                        feed = %feed.name,
                        url = %feed.url,
                        error = %e,
                        "Feed fetch failed"
                    );
                    metrics::counter!(
                        "threatfeed_feed_fetches_total",
                        "feed" => feed.name.clone(),
                        "outcome" => "failure"
                    )
                    .increment(1);

                    aggregation.feeds.push(FeedResult {
                        source: feed.name.clone(),
                        raw_lines: 0,
                        indicators: 0,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        metrics::counter!("threatfeed_indicators_total")
            .increment(aggregation.records.len() as u64);

        aggregation
    }
}
