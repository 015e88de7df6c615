use crate::jobs::SourceId;
use std::collections::HashSet;
use thiserror::Error;

/// Feeds polled when the configuration file does not list its own sources.
pub const DEFAULT_FEEDS: &[(&str, &str)] = &[
    ("RemoteOK", "https://remoteok.com/remote-jobs.rss"),
    (
        "WeWorkRemotely",
        "https://weworkremotely.com/categories/remote-programming-jobs.rss",
    ),
    ("Remotive", "https://remotive.com/remote-jobs/software-dev.rss"),
    (
        "WorkingNomads",
        "https://www.workingnomads.com/jobs.rss?category=development",
    ),
    ("JSRemotely", "https://jsremotely.com/rss"),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Duplicate feed source id: {0}")]
    DuplicateSource(String),
    #[error("Feed source id must not be empty")]
    EmptyId,
}

/// A configured feed: identifier plus URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSource {
    pub id: SourceId,
    pub url: String,
}

/// Immutable, ordered set of feed sources.
///
/// Enumeration order is the order sources were given in, which is also the
/// order their records appear in before sorting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRegistry {
    sources: Vec<FeedSource>,
}

impl SourceRegistry {
    /// Builds a registry, rejecting empty or repeated identifiers.
    pub fn new(sources: Vec<FeedSource>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::with_capacity(sources.len());
        for source in &sources {
            if source.id.as_str().is_empty() {
                return Err(RegistryError::EmptyId);
            }
            if !seen.insert(source.id.as_str()) {
                return Err(RegistryError::DuplicateSource(source.id.to_string()));
            }
        }
        Ok(Self { sources })
    }

    /// Convenience constructor from `(id, url)` pairs.
    pub fn from_pairs<I, S, U>(pairs: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (S, U)>,
        S: AsRef<str>,
        U: Into<String>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(id, url)| FeedSource {
                    id: SourceId::new(id),
                    url: url.into(),
                })
                .collect(),
        )
    }

    /// Looks up a source by identifier.
    ///
    /// # Arguments
    ///
    /// * `id` - Source identifier, compared exactly (case-sensitive)
    ///
    /// # Returns
    ///
    /// The matching [`FeedSource`], or `None` for an unknown identifier.
    pub fn get(&self, id: &str) -> Option<&FeedSource> {
        self.sources.iter().find(|s| s.id.as_str() == id)
    }

    /// Returns the feed URL registered for `id`, or `None` if it is unknown.
    pub fn url(&self, id: &str) -> Option<&str> {
        self.get(id).map(|s| s.url.as_str())
    }

    /// Identifiers in registry order.
    pub fn ids(&self) -> impl Iterator<Item = &SourceId> {
        self.sources.iter().map(|s| &s.id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FeedSource> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self {
            sources: DEFAULT_FEEDS
                .iter()
                .map(|(id, url)| FeedSource {
                    id: SourceId::new(id),
                    url: (*url).to_string(),
                })
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a SourceRegistry {
    type Item = &'a FeedSource;
    type IntoIter = std::slice::Iter<'a, FeedSource>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
