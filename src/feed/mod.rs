//! Feed sources and feed retrieval.
//!
//! - [`registry`] - The ordered set of feeds to poll
//! - [`parser`] - RSS/Atom parsing using the `feed-rs` crate
//! - [`fetcher`] - The [`FeedFetcher`] seam and its HTTP implementation

mod fetcher;
mod parser;
mod registry;

pub use fetcher::{
    FeedFetcher, FetchError, HttpFetcher, DEFAULT_FETCH_TIMEOUT, DEFAULT_MAX_FEED_SIZE,
};
pub use parser::parse_feed;
pub use registry::{FeedSource, RegistryError, SourceRegistry, DEFAULT_FEEDS};
