use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::AnimeId;

/// One entry of a remote catalog page. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: AnimeId,
    pub title: String,
    pub title_english: Option<String>,
    /// Standard resolution cover.
    pub image_url: String,
    /// Highest resolution cover the catalog offered, if any.
    pub large_image_url: Option<String>,
    pub kind: Option<String>,
    pub episodes: Option<i32>,
    pub score: Option<f64>,
    pub synopsis: Option<String>,
    pub status: Option<String>,
    pub aired_from: Option<DateTime<Utc>>,
    pub aired_to: Option<DateTime<Utc>>,
    pub genres: Vec<String>,
    pub studios: Vec<String>,
}

impl CatalogItem {
    /// English title when present and non-empty, otherwise the default title.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title_english
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.title)
    }
}

/// The query a page belongs to. Browsing and searching never mix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "term", rename_all = "snake_case")]
pub enum QueryContext {
    #[default]
    Top,
    Search(String),
}

impl QueryContext {
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        match self {
            Self::Top => None,
            Self::Search(term) => Some(term),
        }
    }

    #[must_use]
    pub const fn is_search(&self) -> bool {
        matches!(self, Self::Search(_))
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Search(_) => "search",
        }
    }
}

/// A single page as returned by the remote catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    pub context: QueryContext,
    pub page: u32,
    pub items: Vec<CatalogItem>,
    pub last_visible_page: u32,
    pub has_next_page: bool,
}

/// What the catalog screen currently shows.
///
/// In paginated mode `items` is exactly one page. In infinite-scroll mode it
/// holds every page of `context` loaded so far, up to `page`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSet {
    pub context: QueryContext,
    pub page: u32,
    pub last_page: u32,
    pub has_next_page: bool,
    pub items: Vec<CatalogItem>,
}

impl Default for ResultSet {
    fn default() -> Self {
        Self {
            context: QueryContext::Top,
            page: 1,
            last_page: 1,
            has_next_page: false,
            items: Vec::new(),
        }
    }
}

impl ResultSet {
    #[must_use]
    pub fn find(&self, id: AnimeId) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
