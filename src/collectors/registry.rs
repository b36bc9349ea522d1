//! Feed registry - the ordered set of feeds a run pulls from

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use validator::Validate;

use crate::models::FeedDescriptor;

const ABUSEIPDB_IPSUM: &str = "https://raw.githubusercontent.com/stamparm/ipsum/master/ipsum.txt";
const MALC0DE_IP_BLACKLIST: &str = "http://malc0de.com/bl/IP_Blacklist.txt";
const OPENPHISH_FEED: &str = "https://openphish.com/feed.txt";

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read feeds file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse feeds file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid feed '{name}': {source}")]
    Invalid {
        name: String,
        #[source]
        source: validator::ValidationErrors,
    },

    #[error("invalid URL for feed '{name}': {source}")]
    Url {
        name: String,
        #[source]
        source: url::ParseError,
    },

    #[error("duplicate feed name '{0}'")]
    Duplicate(String),

    #[error("feed registry is empty")]
    Empty,
}

/// Immutable, ordered list of feeds
#[derive(Debug, Clone)]
pub struct FeedRegistry {
    feeds: Vec<FeedDescriptor>,
}

impl FeedRegistry {
    /// The public feeds fetched when no feeds file is given
    pub fn builtin() -> Self {
        Self {
            feeds: vec![
                FeedDescriptor::new("AbuseIPDB", ABUSEIPDB_IPSUM),
                FeedDescriptor::new("Malc0de", MALC0DE_IP_BLACKLIST),
                FeedDescriptor::new("OpenPhish", OPENPHISH_FEED),
            ],
        }
    }

    /// Build a registry from descriptors, rejecting empty lists, bad URLs and
    /// duplicate names
    pub fn from_descriptors(feeds: Vec<FeedDescriptor>) -> Result<Self, RegistryError> {
        if feeds.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for feed in &feeds {
            feed.validate().map_err(|source| RegistryError::Invalid {
                name: feed.name.clone(),
                source,
            })?;
            url::Url::parse(&feed.url).map_err(|source| RegistryError::Url {
                name: feed.name.clone(),
                source,
            })?;
            if !seen.insert(feed.name.as_str()) {
                return Err(RegistryError::Duplicate(feed.name.clone()));
            }
        }

        Ok(Self { feeds })
    }

    /// Load a registry from a JSON array of `{ "name", "url" }` objects
    pub async fn from_json_file(path: &Path) -> Result<Self, RegistryError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| RegistryError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let feeds: Vec<FeedDescriptor> =
            serde_json::from_str(&content).map_err(|source| RegistryError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        Self::from_descriptors(feeds)
    }

    pub fn feeds(&self) -> &[FeedDescriptor] {
        &self.feeds
    }

    pub fn len(&self) -> usize {
        self.feeds.len()
    }
}
