use crate::feed::parser::parse_feed;
use crate::jobs::RawFeedItem;
use async_trait::async_trait;
use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Errors that can occur while retrieving and parsing one feed.
///
/// A fetch error only ever affects the source it came from.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// Feed XML could not be parsed as RSS or Atom
    #[error("Parse error: {0}")]
    Parse(String),
    /// Response body exceeded the size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Received fewer bytes than Content-Length announced
    #[error("Incomplete response: expected {expected} bytes, received {received}")]
    IncompleteResponse { expected: u64, received: usize },
}

/// Turns a feed URL into raw items.
///
/// This is the seam the aggregator depends on; tests substitute in-memory
/// implementations.
/// Retrieves and parses one feed.
///
/// The aggregator only talks to feeds through this trait, so tests can
/// substitute canned items for network access.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Fetches `url` once and returns its items in feed order.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] for network failures, non-success statuses,
    /// timeouts, oversized or truncated bodies and unparsable feeds.
    async fn fetch(&self, url: &str) -> Result<Vec<RawFeedItem>, FetchError>;
}

/// Fetches feeds over HTTP with reqwest and parses them with feed-rs.
///
/// Each call makes exactly one request. There is no retry and no caching.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
    max_size: usize,
}

impl HttpFetcher {
    /// Creates a fetcher with the default timeout and size cap.
    ///
    /// # Arguments
    ///
    /// * `client` - Shared reqwest client; its User-Agent and connection pool
    ///   are used for every request
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            timeout: DEFAULT_FETCH_TIMEOUT,
            max_size: DEFAULT_MAX_FEED_SIZE,
        }
    }

    /// Sets the upper bound on one fetch.
    ///
    /// The timeout covers connecting, the response headers and the whole body
    /// download. An expired fetch fails with [`FetchError::Timeout`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the largest accepted body in bytes.
    ///
    /// Larger bodies fail with [`FetchError::ResponseTooLarge`], whether
    /// announced by `Content-Length` or discovered while streaming.
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::Network)?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status().as_u16()));
        }

        read_limited_bytes(response, self.max_size).await
    }
}

#[async_trait]
impl FeedFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<RawFeedItem>, FetchError> {
        // The timeout covers the body download as well as the headers
        let bytes = tokio::time::timeout(self.timeout, self.fetch_bytes(url))
            .await
            .map_err(|_| FetchError::Timeout)??;

        let items = parse_feed(&bytes).map_err(|e| FetchError::Parse(e.to_string()))?;
        tracing::debug!(feed = %url, items = items.len(), "Parsed feed");
        Ok(items)
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    let expected_length = response.content_length();

    // Fast path: check Content-Length header
    if let Some(len) = expected_length {
        if len > limit as u64 {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    if let Some(expected) = expected_length {
        if (bytes.len() as u64) < expected {
            return Err(FetchError::IncompleteResponse {
                expected,
                received: bytes.len(),
            });
        }
    }

    Ok(bytes)
}
