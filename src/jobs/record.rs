use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Company shown when a feed item carries no author or creator.
pub const UNKNOWN_COMPANY: &str = "(Unknown company)";

/// Identifier of a configured feed source (e.g. `RemoteOK`).
///
/// Cheap to clone: every record produced from a source shares the same `Arc<str>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(Arc<str>);

impl SourceId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for SourceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Loosely-typed item as produced by feed parsing. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFeedItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub guid: Option<String>,
    pub creator: Option<String>,
    /// RFC 3339 timestamp, normalized to UTC by the parser.
    pub iso_date: Option<String>,
    /// Plain-text excerpt of the item body.
    pub content_snippet: Option<String>,
}

/// Canonical job posting returned by the search API.
///
/// Serialized with camelCase keys; `publishedAt` and `summary` are omitted when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    /// `{source}-{guid}` (or `{source}-{link}` when the item has no guid)
    pub id: String,
    pub title: String,
    pub company: String,
    /// Always empty: none of the configured feeds expose a location field.
    pub location: String,
    pub link: String,
    pub source: SourceId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl JobRecord {
    /// Text the query filter and the entry-level classifier both look at.
    pub fn search_text(&self) -> String {
        format!("{} {}", self.title, self.summary.as_deref().unwrap_or(""))
    }
}
