pub mod jikan;

use thiserror::Error;

use crate::domain::AnimeId;
use crate::models::catalog::{CatalogItem, PageResult};

/// Failures of the remote catalog, plus argument errors raised by callers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed catalog response: {0}")]
    Parse(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CatalogError {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Parse(_) => "parse",
            Self::InvalidArgument(_) => "invalid_argument",
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Port to a remote anime catalog.
///
/// Implementations never retry; the controllers decide what a failure means.
/// An empty search query is the caller's responsibility.
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    /// One page of the top-ranked listing.
    async fn fetch_top(&self, page: u32) -> Result<PageResult, CatalogError>;

    /// One page of results for `query`.
    async fn search(&self, query: &str, page: u32) -> Result<PageResult, CatalogError>;

    /// A single item by identity, `None` when the catalog does not know it.
    async fn fetch_anime(&self, id: AnimeId) -> Result<Option<CatalogItem>, CatalogError>;
}
