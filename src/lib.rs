//! Remote job search over public RSS feeds.
//!
//! Feeds listed in a [`feed::SourceRegistry`] are fetched concurrently,
//! normalized into [`jobs::JobRecord`]s, optionally filtered to entry-level
//! postings and served newest-first through a small JSON API ([`server`]).

pub mod config;
pub mod feed;
pub mod jobs;
pub mod server;
pub mod util;
