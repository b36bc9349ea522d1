//! Plain-text feed fetcher over HTTP

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::collectors::FeedFetcher;
use crate::models::FeedDescriptor;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const USER_AGENT: &str = concat!("threatfeed-aggregator/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("HTTP {0}")]
    Status(StatusCode),

    #[error("failed to read body: {0}")]
    Body(#[source] reqwest::Error),
}

/// Fetches a feed with one unauthenticated GET
pub struct HttpFeedFetcher {
    client: Client,
}

impl HttpFeedFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self, feed: &FeedDescriptor) -> Result<Vec<String>, FetchError> {
        let response = self
            .client
            .get(&feed.url)
            .send()
            .await
            .map_err(FetchError::Request)?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let text = response.text().await.map_err(FetchError::Body)?;

        Ok(split_lines(&text))
    }
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\x0b'
            | '\x0c'
            | '\x1c'
            | '\x1d'
            | '\x1e'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Split a feed body into lines. Breaks on `\n`, `\r\n`, a bare `\r` and the
/// other Unicode line boundaries; a trailing break does not yield an empty line.
pub fn split_lines(text: &str) -> Vec<String> {
    let mut lines = vec![];
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        lines.push(text[start..idx].to_string());
        start = idx + c.len_utf8();
        if c == '\r' && matches!(chars.peek(), Some((_, '\n'))) {
            chars.next();
            start += 1;
        }
    }

    if start < text.len() {
        lines.push(text[start..].to_string());
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn feed_at(server: &MockServer, route: &str) -> FeedDescriptor {
        FeedDescriptor::new("Mock", format!("{}{}", server.uri(), route))
    }

    #[tokio::test]
    async fn test_fetch_splits_lines() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ips.txt"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("# ipsum\r\n1.2.3.4\n\nhttp://evil.com/x\n"),
            )
            .mount(&server)
            .await;

        let fetcher = HttpFeedFetcher::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS)).unwrap();
        let lines = fetcher.fetch(&feed_at(&server, "/ips.txt")).await.unwrap();

        assert_eq!(lines, vec!["# ipsum", "1.2.3.4", "", "http://evil.com/x"]);
    }

    #[tokio::test]
    async fn test_fetch_splits_bare_carriage_returns() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cr.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("1.2.3.4\r5.6.7.8\r"))
            .mount(&server)
            .await;

        let fetcher = HttpFeedFetcher::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS)).unwrap();
        let lines = fetcher.fetch(&feed_at(&server, "/cr.txt")).await.unwrap();

        assert_eq!(lines, vec!["1.2.3.4", "5.6.7.8"]);
    }

    #[test]
    fn test_split_lines_boundaries() {
        assert_eq!(split_lines("a\r\nb\n\nc"), vec!["a", "b", "", "c"]);
        assert_eq!(split_lines("a\x0bb\x0cc\u{85}d\u{2028}e"), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(split_lines("a\r\r\nb"), vec!["a", "", "b"]);
        assert_eq!(split_lines("\n"), vec![""]);
        assert_eq!(split_lines("tail\n"), vec!["tail"]);
        assert!(split_lines("").is_empty());
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let fetcher = HttpFeedFetcher::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS)).unwrap();
        let err = fetcher.fetch(&feed_at(&server, "/down")).await.unwrap_err();

        assert!(matches!(err, FetchError::Status(StatusCode::SERVICE_UNAVAILABLE)));
        assert_eq!(err.to_string(), "HTTP 503 Service Unavailable");
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let fetcher = HttpFeedFetcher::new(Duration::from_millis(50)).unwrap();
        let err = fetcher.fetch(&feed_at(&server, "/slow")).await.unwrap_err();

        assert!(matches!(err, FetchError::Request(ref e) if e.is_timeout()));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Port 9 (discard) is not expected to be listening locally
        let feed = FeedDescriptor::new("Nowhere", "http://127.0.0.1:9/feed.txt");
        let fetcher = HttpFeedFetcher::new(Duration::from_secs(2)).unwrap();

        assert!(matches!(fetcher.fetch(&feed).await, Err(FetchError::Request(_))));
    }
}
