//! Scripted in-process catalog used by the integration tests.
//!
//! Pages are generated on demand. Individual requests can be held open with
//! [`FakeCatalog::hold`] or made to fail with [`FakeCatalog::fail`].

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use animeshelf::clients::{CatalogClient, CatalogError};
use animeshelf::domain::AnimeId;
use animeshelf::models::catalog::{CatalogItem, PageResult, QueryContext};
use tokio::sync::oneshot;

pub const PER_PAGE: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RequestKey {
    Top(u32),
    Search(String, u32),
    Anime(AnimeId),
}

#[derive(Default)]
struct Script {
    last_page: u32,
    gates: HashMap<RequestKey, oneshot::Receiver<()>>,
    failures: HashSet<RequestKey>,
    known: HashMap<AnimeId, CatalogItem>,
    calls: Vec<RequestKey>,
}

pub struct FakeCatalog {
    script: Mutex<Script>,
}

impl FakeCatalog {
    pub fn new(last_page: u32) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(Script {
                last_page,
                ..Script::default()
            }),
        })
    }

    /// Keeps `key` pending until the returned sender fires or is dropped.
    pub fn hold(&self, key: RequestKey) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.script.lock().unwrap().gates.insert(key, rx);
        tx
    }

    pub fn fail(&self, key: RequestKey) {
        self.script.lock().unwrap().failures.insert(key);
    }

    /// Makes `fetch_anime` find `item`.
    pub fn know(&self, item: CatalogItem) {
        self.script.lock().unwrap().known.insert(item.id, item);
    }

    pub fn calls(&self) -> Vec<RequestKey> {
        self.script.lock().unwrap().calls.clone()
    }

    pub async fn wait_for_calls(&self, count: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.calls().len() < count {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("catalog was never called");
    }

    async fn enter(&self, key: RequestKey) -> Result<(), CatalogError> {
        let gate = {
            let mut script = self.script.lock().unwrap();
            script.calls.push(key.clone());
            script.gates.remove(&key)
        };

        if let Some(gate) = gate {
            let _ = gate.await;
        }

        if self.script.lock().unwrap().failures.contains(&key) {
            return Err(CatalogError::Network("connection reset".to_string()));
        }
        Ok(())
    }

    fn page(&self, context: QueryContext, page: u32, base: i32) -> PageResult {
        let last_page = self.script.lock().unwrap().last_page;
        let items = (0..PER_PAGE)
            .map(|i| {
                let id = base + i32::try_from(page).unwrap() * 100 + i32::try_from(i).unwrap();
                let title = match &context {
                    QueryContext::Top => format!("Top {page}.{i}"),
                    QueryContext::Search(term) => format!("{term} {page}.{i}"),
                };
                item(id, &title)
            })
            .collect();

        PageResult {
            context,
            page,
            items,
            last_visible_page: last_page,
            has_next_page: page < last_page,
        }
    }
}

#[async_trait::async_trait]
impl CatalogClient for FakeCatalog {
    async fn fetch_top(&self, page: u32) -> Result<PageResult, CatalogError> {
        self.enter(RequestKey::Top(page)).await?;
        Ok(self.page(QueryContext::Top, page, 0))
    }

    async fn search(&self, query: &str, page: u32) -> Result<PageResult, CatalogError> {
        self.enter(RequestKey::Search(query.to_string(), page))
            .await?;
        Ok(self.page(QueryContext::Search(query.to_string()), page, 10_000))
    }

    async fn fetch_anime(&self, id: AnimeId) -> Result<Option<CatalogItem>, CatalogError> {
        self.enter(RequestKey::Anime(id)).await?;
        Ok(self.script.lock().unwrap().known.get(&id).cloned())
    }
}

/// Id of the `index`th item on `page` of the top listing.
pub fn top_id(page: u32, index: usize) -> AnimeId {
    AnimeId::new(i32::try_from(page).unwrap() * 100 + i32::try_from(index).unwrap())
}

pub fn item(id: i32, title: &str) -> CatalogItem {
    CatalogItem {
        id: AnimeId::new(id),
        title: title.to_string(),
        title_english: None,
        image_url: format!("https://cdn.myanimelist.net/images/anime/{id}.jpg"),
        large_image_url: None,
        kind: Some("TV".to_string()),
        episodes: Some(12),
        score: Some(7.5),
        synopsis: Some(format!("Synopsis of {title}")),
        status: Some("Finished Airing".to_string()),
        aired_from: None,
        aired_to: None,
        genres: vec!["Action".to_string()],
        studios: vec!["Bones".to_string()],
    }
}
