//! Utility functions shared by the feed and search layers.
//!
//! - **Text**: HTML to plain-text snippets, control-character handling
//! - **URL validation**: rejects non-HTTP and private-network feed URLs

mod text;
mod url_validator;

pub use text::{contains_control_chars, html_to_snippet, strip_control_chars};
pub use url_validator::{validate_url, UrlValidationError};

/// Maximum accepted length (in characters) of the free-text search query.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;
