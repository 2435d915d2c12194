use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use crate::clients::{CatalogClient, CatalogError};
use crate::config::JikanConfig;
use crate::constants::jikan::USER_AGENT;
use crate::domain::AnimeId;
use crate::models::catalog::{CatalogItem, PageResult, QueryContext};

#[derive(Debug, Deserialize)]
struct JikanResponse<T> {
    data: T,
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
struct Pagination {
    last_visible_page: u32,
    #[serde(default)]
    has_next_page: bool,
}

#[derive(Debug, Deserialize)]
pub struct MalAnime {
    pub mal_id: i32,
    pub title: String,
    pub title_english: Option<String>,
    #[serde(default)]
    pub images: MalImages,
    pub episodes: Option<i32>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub anime_type: Option<String>,
    pub score: Option<f64>,
    pub synopsis: Option<String>,
    pub genres: Option<Vec<MalGenericInfo>>,
    pub studios: Option<Vec<MalGenericInfo>>,
    pub aired: Option<Aired>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MalImages {
    #[serde(default)]
    pub jpg: MalImageSet,
    pub webp: Option<MalImageSet>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MalImageSet {
    pub image_url: Option<String>,
    pub large_image_url: Option<String>,
    pub maximum_image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Aired {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MalGenericInfo {
    pub mal_id: i32,
    pub name: String,
}

impl MalAnime {
    /// Highest resolution cover available: webp maximum, webp large, jpg large.
    fn best_image(&self) -> Option<String> {
        let webp = self.images.webp.as_ref();
        webp.and_then(|w| w.maximum_image_url.clone())
            .or_else(|| webp.and_then(|w| w.large_image_url.clone()))
            .or_else(|| self.images.jpg.large_image_url.clone())
    }

    fn into_item(self) -> CatalogItem {
        let large_image_url = self.best_image();
        let (aired_from, aired_to) = self.aired.map_or((None, None), |a| {
            (parse_timestamp(a.from.as_deref()), parse_timestamp(a.to.as_deref()))
        });

        CatalogItem {
            id: AnimeId::new(self.mal_id),
            title: self.title,
            title_english: self.title_english,
            image_url: self.images.jpg.image_url.unwrap_or_default(),
            large_image_url,
            kind: self.anime_type,
            episodes: self.episodes,
            score: self.score,
            synopsis: self.synopsis,
            status: self.status,
            aired_from,
            aired_to,
            genres: names(self.genres),
            studios: names(self.studios),
        }
    }
}

fn names(infos: Option<Vec<MalGenericInfo>>) -> Vec<String> {
    infos
        .unwrap_or_default()
        .into_iter()
        .map(|info| info.name)
        .collect()
}

/// Jikan dates are RFC 3339, but a bad one should not sink the whole page.
fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(date) => Some(date.with_timezone(&Utc)),
        Err(e) => {
            debug!("Ignoring unparsable aired date '{}': {}", raw, e);
            None
        }
    }
}

/// Decodes a Jikan list payload into a page for `context`.
pub fn parse_page(body: &str, context: QueryContext, page: u32) -> Result<PageResult, CatalogError> {
    let response: JikanResponse<Vec<MalAnime>> = serde_json::from_str(body)?;

    let (last_visible_page, has_next_page) = response
        .pagination
        .map_or((page, false), |p| (p.last_visible_page, p.has_next_page));

    Ok(PageResult {
        context,
        page,
        items: response.data.into_iter().map(MalAnime::into_item).collect(),
        last_visible_page: last_visible_page.max(1),
        has_next_page,
    })
}

#[derive(Clone)]
pub struct JikanClient {
    client: Client,
    config: JikanConfig,
}

impl JikanClient {
    pub fn new(config: JikanConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build Jikan HTTP client: {e}"))?;

        Ok(Self { client, config })
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    /// Fetches `url` and returns the raw body, `None` on 404.
    async fn get_body(&self, url: &str) -> Result<Option<String>, CatalogError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Jikan API error: {} - {}", status, body);
            return Err(CatalogError::Network(format!(
                "Jikan API error: {status} - {body}"
            )));
        }

        Ok(Some(response.text().await?))
    }

    async fn get_page(
        &self,
        url: &str,
        context: QueryContext,
        page: u32,
    ) -> Result<PageResult, CatalogError> {
        let body = self
            .get_body(url)
            .await?
            .ok_or_else(|| CatalogError::Network(format!("Jikan API error: 404 for {url}")))?;
        parse_page(&body, context, page)
    }

    async fn get_single<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, CatalogError> {
        match self.get_body(url).await? {
            Some(body) => {
                let response: JikanResponse<T> = serde_json::from_str(&body)?;
                Ok(Some(response.data))
            }
            None => Ok(None),
        }
    }
}

#[async_trait::async_trait]
impl CatalogClient for JikanClient {
    async fn fetch_top(&self, page: u32) -> Result<PageResult, CatalogError> {
        let url = format!(
            "{}/top/anime?page={}&limit={}&order_by={}&sort={}",
            self.base_url(),
            page,
            self.config.top_page_size,
            urlencoding::encode(&self.config.order_by),
            urlencoding::encode(&self.config.sort),
        );
        self.get_page(&url, QueryContext::Top, page).await
    }

    async fn search(&self, query: &str, page: u32) -> Result<PageResult, CatalogError> {
        let mut url = format!(
            "{}/anime?q={}&page={}&limit={}",
            self.base_url(),
            urlencoding::encode(query),
            page,
            self.config.search_page_size,
        );
        if self.config.safe_for_work {
            url.push_str("&sfw=true");
        }
        self.get_page(&url, QueryContext::Search(query.to_string()), page)
            .await
    }

    async fn fetch_anime(&self, id: AnimeId) -> Result<Option<CatalogItem>, CatalogError> {
        let url = format!("{}/anime/{}", self.base_url(), id);
        let anime: Option<MalAnime> = self.get_single(&url).await?;
        Ok(anime.map(MalAnime::into_item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOP_PAGE: &str = r#"{
        "pagination": {
            "last_visible_page": 1127,
            "has_next_page": true,
            "current_page": 2,
            "items": { "count": 1, "total": 27033, "per_page": 24 }
        },
        "data": [
            {
                "mal_id": 5114,
                "url": "https://myanimelist.net/anime/5114",
                "images": {
                    "jpg": {
                        "image_url": "https://cdn.myanimelist.net/images/anime/1208/94745.jpg",
                        "small_image_url": "https://cdn.myanimelist.net/images/anime/1208/94745t.jpg",
                        "large_image_url": "https://cdn.myanimelist.net/images/anime/1208/94745l.jpg"
                    },
                    "webp": {
                        "image_url": "https://cdn.myanimelist.net/images/anime/1208/94745.webp",
                        "large_image_url": "https://cdn.myanimelist.net/images/anime/1208/94745l.webp"
                    }
                },
                "title": "Fullmetal Alchemist: Brotherhood",
                "title_english": "Fullmetal Alchemist: Brotherhood",
                "type": "TV",
                "episodes": 64,
                "status": "Finished Airing",
                "aired": {
                    "from": "2009-04-05T00:00:00+00:00",
                    "to": "2010-07-04T00:00:00+00:00",
                    "string": "Apr 5, 2009 to Jul 4, 2010"
                },
                "score": 9.1,
                "synopsis": "After a horrific alchemy experiment goes wrong...",
                "genres": [
                    { "mal_id": 1, "type": "anime", "name": "Action", "url": "https://myanimelist.net/anime/genre/1/Action" },
                    { "mal_id": 2, "type": "anime", "name": "Adventure", "url": "https://myanimelist.net/anime/genre/2/Adventure" }
                ],
                "studios": [
                    { "mal_id": 4, "type": "anime", "name": "Bones", "url": "https://myanimelist.net/anime/producer/4/Bones" }
                ]
            }
        ]
    }"#;

    #[test]
    fn parses_top_page_with_pagination() {
        let page = parse_page(TOP_PAGE, QueryContext::Top, 2).unwrap();

        assert_eq!(page.page, 2);
        assert_eq!(page.last_visible_page, 1127);
        assert!(page.has_next_page);
        assert_eq!(page.items.len(), 1);

        let item = &page.items[0];
        assert_eq!(item.id, AnimeId::new(5114));
        assert_eq!(item.kind.as_deref(), Some("TV"));
        assert_eq!(item.episodes, Some(64));
        assert_eq!(
            item.image_url,
            "https://cdn.myanimelist.net/images/anime/1208/94745.jpg"
        );
        assert_eq!(
            item.large_image_url.as_deref(),
            Some("https://cdn.myanimelist.net/images/anime/1208/94745l.webp")
        );
        assert_eq!(item.genres, vec!["Action", "Adventure"]);
        assert_eq!(item.studios, vec!["Bones"]);
        assert_eq!(
            item.aired_from.map(|d| d.to_rfc3339()).as_deref(),
            Some("2009-04-05T00:00:00+00:00")
        );
    }

    #[test]
    fn tolerates_missing_optionals_and_bad_dates() {
        let body = r#"{
            "pagination": { "last_visible_page": 0, "has_next_page": false },
            "data": [{
                "mal_id": 60000,
                "title": "Untitled Project",
                "images": { "jpg": { "image_url": "https://img/60000.jpg" } },
                "type": null,
                "episodes": null,
                "score": null,
                "aired": { "from": "sometime in 2027", "to": null }
            }]
        }"#;

        let page = parse_page(body, QueryContext::Search("untitled".into()), 1).unwrap();

        assert_eq!(page.last_visible_page, 1);
        let item = &page.items[0];
        assert!(item.kind.is_none());
        assert!(item.aired_from.is_none());
        assert!(item.genres.is_empty());
        assert!(item.large_image_url.is_none());
    }

    #[test]
    fn malformed_body_is_a_parse_error() {
        let err = parse_page("{\"data\": 42}", QueryContext::Top, 1).unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));

        let err = parse_page("<html>rate limited</html>", QueryContext::Top, 1).unwrap_err();
        assert_eq!(err.kind(), "parse");
    }
}
