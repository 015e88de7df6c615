use super::classify::EntryLevelClassifier;
use super::normalize::normalize;
use super::record::{JobRecord, SourceId};
use crate::feed::{FeedFetcher, FeedSource, SourceRegistry};
use crate::util::{contains_control_chars, MAX_SEARCH_QUERY_LENGTH};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use futures::stream::{self, StreamExt};
use std::cmp::Reverse;
use std::sync::Arc;
use thiserror::Error;

pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 10;

/// Region used when a request does not name one.
pub const DEFAULT_REGION: &str = "global";

/// Failures that abort a whole search. Individual feed failures never do.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregationError {
    #[error("Search query too long: {len} characters (max {max})")]
    QueryTooLong { len: usize, max: usize },
    #[error("Search query contains control characters")]
    InvalidQuery,
}

/// Parameters of one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Free-text filter; empty matches everything.
    pub query: String,
    /// Accepted for compatibility with clients; does not affect results.
    pub region: String,
    pub entry_only: bool,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            region: DEFAULT_REGION.to_string(),
            entry_only: false,
        }
    }
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn entry_only(mut self, entry_only: bool) -> Self {
        self.entry_only = entry_only;
        self
    }

    fn validate(&self) -> Result<(), AggregationError> {
        let len = self.query.chars().count();
        if len > MAX_SEARCH_QUERY_LENGTH {
            return Err(AggregationError::QueryTooLong {
                len,
                max: MAX_SEARCH_QUERY_LENGTH,
            });
        }
        if contains_control_chars(&self.query) {
            return Err(AggregationError::InvalidQuery);
        }
        Ok(())
    }
}

/// What one source contributed to a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub source: SourceId,
    /// Raw items the feed returned (0 on failure)
    pub fetched: usize,
    /// Items that survived normalization and the query filter
    pub accepted: usize,
    pub error: Option<String>,
}

/// Result of a search with per-source bookkeeping.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub jobs: Vec<JobRecord>,
    /// One entry per registered source, in registry order
    pub sources: Vec<SourceReport>,
}

impl SearchOutcome {
    pub fn failed_sources(&self) -> impl Iterator<Item = &SourceReport> {
        self.sources.iter().filter(|r| r.error.is_some())
    }
}

/// Fans a search out over every registered feed and merges the results.
///
/// Holds no per-request state, so one instance is shared by all requests.
pub struct Aggregator {
    registry: Arc<SourceRegistry>,
    fetcher: Arc<dyn FeedFetcher>,
    classifier: EntryLevelClassifier,
    max_concurrent: usize,
}

impl Aggregator {
    pub fn new(
        registry: Arc<SourceRegistry>,
        fetcher: Arc<dyn FeedFetcher>,
        classifier: EntryLevelClassifier,
    ) -> Self {
        Self {
            registry,
            fetcher,
            classifier,
            max_concurrent: DEFAULT_MAX_CONCURRENT_FETCHES,
        }
    }

    /// Caps how many feeds are fetched at once (minimum 1).
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Runs a search and returns the matching jobs, newest first.
    pub async fn aggregate(&self, request: &SearchRequest) -> Result<Vec<JobRecord>, AggregationError> {
        Ok(self.search(request).await?.jobs)
    }

    /// Runs a search and also reports what each source contributed.
    ///
    /// # Behavior
    ///
    /// - Every source is fetched exactly once, up to `max_concurrent` at a time
    /// - A failing source is logged and contributes no jobs
    /// - Results from successful sources are merged in registry order, then feed order
    /// - With `entry_only`, jobs not classified entry-level are dropped
    /// - Jobs are stably sorted by `published_at`, newest first; missing or
    ///   unparsable dates sort as the Unix epoch
    ///
    /// # Errors
    ///
    /// Only request validation fails the search: see [`AggregationError`].
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome, AggregationError> {
        request.validate()?;

        if request.region != DEFAULT_REGION {
            tracing::debug!(region = %request.region, "Region filter requested (not applied)");
        }

        let query: Option<Arc<str>> =
            Some(request.query.as_str()).filter(|q| !q.is_empty()).map(Arc::from);

        // buffered() keeps registry order in the output while fetching concurrently
        let per_source: Vec<(SourceReport, Vec<JobRecord>)> =
            stream::iter(self.registry.iter().cloned())
                .map(|source| {
                    let fetcher = Arc::clone(&self.fetcher);
                    let query = query.clone();
                    async move { collect_source(fetcher.as_ref(), source, query.as_deref()).await }
                })
                .buffered(self.max_concurrent)
                .collect()
                .await;

        let (sources, batches): (Vec<_>, Vec<_>) = per_source.into_iter().unzip();
        let mut jobs: Vec<JobRecord> = batches.into_iter().flatten().collect();
        let merged = jobs.len();

        if request.entry_only {
            jobs.retain(|job| self.classifier.is_entry_level(job));
        }

        sort_newest_first(&mut jobs);

        let failed = sources.iter().filter(|r| r.error.is_some()).count();
        tracing::info!(
            sources = sources.len(),
            failed = failed,
            merged = merged,
            returned = jobs.len(),
            entry_only = request.entry_only,
            "Job search complete"
        );

        Ok(SearchOutcome { jobs, sources })
    }
}

async fn collect_source(
    fetcher: &dyn FeedFetcher,
    source: FeedSource,
    query: Option<&str>,
) -> (SourceReport, Vec<JobRecord>) {
    match fetcher.fetch(&source.url).await {
        Ok(items) => {
            let jobs: Vec<JobRecord> = items
                .iter()
                .filter_map(|item| normalize(item, &source.id, query))
                .collect();
            tracing::debug!(
                source = %source.id,
                fetched = items.len(),
                accepted = jobs.len(),
                "Feed collected"
            );
            let report = SourceReport {
                source: source.id.clone(),
                fetched: items.len(),
                accepted: jobs.len(),
                error: None,
            };
            (report, jobs)
        }
        Err(e) => {
            tracing::warn!(source = %source.id, url = %source.url, error = %e, "Feed fetch failed");
            let report = SourceReport {
                source: source.id.clone(),
                fetched: 0,
                accepted: 0,
                error: Some(e.to_string()),
            };
            (report, Vec::new())
        }
    }
}

/// Date-time layouts without an offset; read as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Milliseconds since the epoch for sorting; 0 when absent or unparsable.
fn published_millis(job: &JobRecord) -> i64 {
    job.published_at
        .as_deref()
        .and_then(|s| parse_timestamp_millis(s.trim()))
        .unwrap_or(0)
}

/// Accepts RFC 3339, RFC 2822, ISO 8601 date-times without an offset and
/// bare `YYYY-MM-DD` dates (midnight UTC).
fn parse_timestamp_millis(s: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s).or_else(|_| DateTime::parse_from_rfc2822(s)) {
        return Some(dt.timestamp_millis());
    }
    if let Some(naive) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(naive.and_utc().timestamp_millis());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().timestamp_millis())
}

/// Stable sort, newest first.
pub fn sort_newest_first(jobs: &mut [JobRecord]) {
    jobs.sort_by_cached_key(|job| Reverse(published_millis(job)));
}
