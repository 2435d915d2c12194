use serde::{Deserialize, Serialize};

use crate::constants::{LIST_SEPARATOR, NOT_AVAILABLE, UNKNOWN};
use crate::domain::AnimeId;
use crate::models::catalog::CatalogItem;

/// Flat, storage-friendly copy of a [`CatalogItem`] the user bookmarked.
///
/// Every optional field of the source item is replaced by a sentinel so the
/// record can be shown without the remote catalog being reachable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    pub id: AnimeId,
    pub title: String,
    pub title_english: String,
    pub image_url: String,
    pub kind: String,
    pub episodes: i32,
    pub score: f64,
    pub synopsis: String,
    pub status: String,
    pub aired_from: String,
    pub aired_to: String,
    pub genres: String,
    pub studios: String,
}

impl FavoriteRecord {
    #[must_use]
    pub fn display_title(&self) -> &str {
        if self.title_english.is_empty() {
            &self.title
        } else {
            &self.title_english
        }
    }
}

impl From<&CatalogItem> for FavoriteRecord {
    fn from(item: &CatalogItem) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            title_english: item.title_english.clone().unwrap_or_default(),
            image_url: item.image_url.clone(),
            kind: or_sentinel(item.kind.as_deref(), UNKNOWN),
            episodes: item.episodes.unwrap_or(0),
            score: item.score.unwrap_or(0.0),
            synopsis: or_sentinel(item.synopsis.as_deref(), NOT_AVAILABLE),
            status: or_sentinel(item.status.as_deref(), UNKNOWN),
            aired_from: item
                .aired_from
                .map_or_else(|| UNKNOWN.to_string(), |d| d.to_rfc3339()),
            aired_to: item
                .aired_to
                .map_or_else(|| UNKNOWN.to_string(), |d| d.to_rfc3339()),
            genres: flatten_names(&item.genres),
            studios: flatten_names(&item.studios),
        }
    }
}

fn or_sentinel(value: Option<&str>, sentinel: &str) -> String {
    value.unwrap_or(sentinel).to_string()
}

/// Jikan sends `[]` rather than omitting the field, so empty counts as absent.
fn flatten_names(names: &[String]) -> String {
    if names.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        names.join(LIST_SEPARATOR)
    }
}
