use chrono::{DateTime, Utc};

use crate::constants::{LIST_SEPARATOR, NOT_AVAILABLE, UNKNOWN, display::DATE_FORMAT};
use crate::domain::AnimeId;
use crate::models::catalog::CatalogItem;
use crate::models::favorite::FavoriteRecord;

/// An item ready for the detail screen, tagged with where it was resolved from.
///
/// The source is decided once when the item is loaded; everything downstream
/// reads through the accessors below.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayItem {
    Remote(CatalogItem),
    Favorite(FavoriteRecord),
}

impl DisplayItem {
    #[must_use]
    pub const fn id(&self) -> AnimeId {
        match self {
            Self::Remote(item) => item.id,
            Self::Favorite(record) => record.id,
        }
    }

    #[must_use]
    pub const fn is_favorite_record(&self) -> bool {
        matches!(self, Self::Favorite(_))
    }

    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Remote(item) => &item.title,
            Self::Favorite(record) => &record.title,
        }
    }

    #[must_use]
    pub fn display_title(&self) -> &str {
        match self {
            Self::Remote(item) => item.display_title(),
            Self::Favorite(record) => record.display_title(),
        }
    }

    /// Best cover available. Remote items prefer the high-res variant.
    #[must_use]
    pub fn image_url(&self) -> &str {
        match self {
            Self::Remote(item) => item.large_image_url.as_deref().unwrap_or(&item.image_url),
            Self::Favorite(record) => &record.image_url,
        }
    }

    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Remote(item) => item.kind.as_deref().unwrap_or(UNKNOWN),
            Self::Favorite(record) => &record.kind,
        }
    }

    /// `None` when the catalog did not report a score.
    #[must_use]
    pub fn score(&self) -> Option<f64> {
        match self {
            Self::Remote(item) => item.score,
            Self::Favorite(record) => (record.score > 0.0).then_some(record.score),
        }
    }

    #[must_use]
    pub fn episodes(&self) -> Option<i32> {
        match self {
            Self::Remote(item) => item.episodes,
            Self::Favorite(record) => (record.episodes > 0).then_some(record.episodes),
        }
    }

    #[must_use]
    pub fn synopsis(&self) -> &str {
        match self {
            Self::Remote(item) => item.synopsis.as_deref().unwrap_or(NOT_AVAILABLE),
            Self::Favorite(record) => &record.synopsis,
        }
    }

    #[must_use]
    pub fn status(&self) -> &str {
        match self {
            Self::Remote(item) => item.status.as_deref().unwrap_or(UNKNOWN),
            Self::Favorite(record) => &record.status,
        }
    }

    /// Start date as `dd/mm/yyyy`, or "Unknown".
    #[must_use]
    pub fn aired_from(&self) -> String {
        match self {
            Self::Remote(item) => format_date(item.aired_from),
            Self::Favorite(record) => format_stored_date(&record.aired_from),
        }
    }

    /// End date as `dd/mm/yyyy`, or "Unknown" while airing.
    #[must_use]
    pub fn aired_to(&self) -> String {
        match self {
            Self::Remote(item) => format_date(item.aired_to),
            Self::Favorite(record) => format_stored_date(&record.aired_to),
        }
    }

    #[must_use]
    pub fn genres(&self) -> String {
        match self {
            Self::Remote(item) => join_or_missing(&item.genres),
            Self::Favorite(record) => record.genres.clone(),
        }
    }

    #[must_use]
    pub fn studios(&self) -> String {
        match self {
            Self::Remote(item) => join_or_missing(&item.studios),
            Self::Favorite(record) => record.studios.clone(),
        }
    }
}

fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map_or_else(
        || UNKNOWN.to_string(),
        |d| d.format(DATE_FORMAT).to_string(),
    )
}

fn format_stored_date(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw).map_or_else(
        |_| UNKNOWN.to_string(),
        |d| d.format(DATE_FORMAT).to_string(),
    )
}

fn join_or_missing(names: &[String]) -> String {
    if names.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        names.join(LIST_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn remote() -> CatalogItem {
        CatalogItem {
            id: AnimeId::new(9253),
            title: "Steins;Gate".to_string(),
            title_english: Some(String::new()),
            image_url: "https://img/9253.jpg".to_string(),
            large_image_url: Some("https://img/9253l.webp".to_string()),
            kind: Some("TV".to_string()),
            episodes: Some(24),
            score: Some(9.07),
            synopsis: None,
            status: Some("Finished Airing".to_string()),
            aired_from: Some(Utc.with_ymd_and_hms(2011, 4, 6, 0, 0, 0).unwrap()),
            aired_to: None,
            genres: vec!["Drama".to_string(), "Sci-Fi".to_string()],
            studios: vec!["White Fox".to_string()],
        }
    }

    #[test]
    fn remote_and_favorite_render_the_same_dates() {
        let item = remote();
        let favorite = DisplayItem::Favorite(FavoriteRecord::from(&item));
        let remote = DisplayItem::Remote(item);

        assert_eq!(remote.aired_from(), "06/04/2011");
        assert_eq!(favorite.aired_from(), "06/04/2011");
        assert_eq!(remote.aired_to(), "Unknown");
        assert_eq!(favorite.aired_to(), "Unknown");
    }

    #[test]
    fn remote_prefers_high_res_cover_favorite_keeps_stored_one() {
        let item = remote();
        let favorite = DisplayItem::Favorite(FavoriteRecord::from(&item));
        let remote = DisplayItem::Remote(item);

        assert_eq!(remote.image_url(), "https://img/9253l.webp");
        assert_eq!(favorite.image_url(), "https://img/9253.jpg");
    }

    #[test]
    fn sentinel_values_read_back_as_missing() {
        let mut item = remote();
        item.score = None;
        item.episodes = None;
        let favorite = DisplayItem::Favorite(FavoriteRecord::from(&item));

        assert_eq!(favorite.score(), None);
        assert_eq!(favorite.episodes(), None);
        assert_eq!(favorite.synopsis(), "Not available");
        assert_eq!(favorite.display_title(), "Steins;Gate");
        assert_eq!(favorite.genres(), "Drama, Sci-Fi");
        assert!(favorite.is_favorite_record());
    }
}
