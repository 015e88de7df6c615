//! Configuration file parser for ~/.config/jobfeed/config.toml.
//!
//! The config file is optional — a missing file yields `Config::default()`.
//! Unknown keys are accepted by serde but logged as warnings, since they are
//! usually typos.
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::feed::{
    RegistryError, SourceRegistry, DEFAULT_FETCH_TIMEOUT, DEFAULT_MAX_FEED_SIZE,
};
use crate::jobs::DEFAULT_MAX_CONCURRENT_FETCHES;
use crate::util::{validate_url, UrlValidationError};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Invalid URL for source '{id}': {source}")]
    InvalidSource {
        id: String,
        #[source]
        source: UrlValidationError,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("`sources` is present but empty; remove it to use the default feeds")]
    EmptySources,
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// One `[[sources]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceConfig {
    pub id: String,
    pub url: String,
}

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the HTTP API listens on.
    pub bind: SocketAddr,

    /// Upper bound on a single feed download, in seconds.
    pub fetch_timeout_secs: u64,

    /// Feeds fetched at the same time during one search.
    pub max_concurrent_fetches: usize,

    /// Largest accepted feed body, in bytes.
    pub max_feed_size_bytes: usize,

    /// User-Agent sent with feed requests.
    pub user_agent: String,

    /// Allow source URLs on localhost or private networks.
    pub allow_private_sources: bool,

    /// Replaces the built-in feed list when present.
    pub sources: Option<Vec<SourceConfig>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT.as_secs(),
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            max_feed_size_bytes: DEFAULT_MAX_FEED_SIZE,
            user_agent: concat!("jobfeed/", env!("CARGO_PKG_VERSION")).to_string(),
            allow_private_sources: false,
            sources: None,
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: &'static [&'static str] = &[
        "bind",
        "fetch_timeout_secs",
        "max_concurrent_fetches",
        "max_feed_size_bytes",
        "user_agent",
        "allow_private_sources",
        "sources",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    /// - Bad or duplicate sources → `Err`, checked via [`Config::registry`]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Check size before reading so a huge file is never loaded into memory
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        let config = Self::from_toml(&content)?;
        // Surface source errors at startup rather than on the first search
        config.registry()?;
        tracing::info!(
            path = %path.display(),
            bind = %config.bind,
            custom_sources = config.sources.is_some(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Parse configuration from TOML text, warning about unknown keys.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        Ok(toml::from_str(content)?)
    }

    /// `fetch_timeout_secs` as a [`Duration`].
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Builds the feed registry: the configured sources, or the defaults.
    ///
    /// # Returns
    ///
    /// [`SourceRegistry::default`] when `sources` is absent, otherwise a
    /// registry holding the configured sources in file order.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::EmptySources`] if `sources` is present but empty
    /// - [`ConfigError::InvalidSource`] if a URL fails [`validate_url`]
    /// - [`ConfigError::Registry`] for empty or repeated source ids
    pub fn registry(&self) -> Result<SourceRegistry, ConfigError> {
        let Some(sources) = &self.sources else {
            return Ok(SourceRegistry::default());
        };
        if sources.is_empty() {
            return Err(ConfigError::EmptySources);
        }

        for source in sources {
            validate_url(&source.url, self.allow_private_sources).map_err(|e| {
                ConfigError::InvalidSource {
                    id: source.id.clone(),
                    source: e,
                }
            })?;
        }

        Ok(SourceRegistry::from_pairs(
            sources.iter().map(|s| (s.id.as_str(), s.url.clone())),
        )?)
    }
}

// ============================================================================
// Tests
// ============================================================================
