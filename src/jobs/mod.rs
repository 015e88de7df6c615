//! Job search pipeline: normalization, classification and aggregation.
//!
//! Raw feed items flow through three stages:
//!
//! 1. [`normalize`] maps each item into a [`JobRecord`] (or drops it)
//! 2. [`EntryLevelClassifier`] optionally keeps only junior-friendly postings
//! 3. [`Aggregator`] fetches every source concurrently, merges and sorts
//!
//! # Example
//!
//! ```ignore
//! let aggregator = Aggregator::new(registry, fetcher, EntryLevelClassifier::standard()?);
//! let jobs = aggregator
//!     .aggregate(&SearchRequest::new("rust").entry_only(true))
//!     .await?;
//! ```

mod aggregate;
mod classify;
mod normalize;
mod record;

pub use aggregate::{
    sort_newest_first, AggregationError, Aggregator, SearchOutcome, SearchRequest, SourceReport,
    DEFAULT_MAX_CONCURRENT_FETCHES, DEFAULT_REGION,
};
pub use classify::{EntryLevelClassifier, Rule, RuleError, Verdict};
pub use normalize::normalize;
pub use record::{JobRecord, RawFeedItem, SourceId, UNKNOWN_COMPANY};
