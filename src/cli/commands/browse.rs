use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use super::render::{describe_reject, favorite_ids, print_detail, print_page};
use crate::domain::AnimeId;
use crate::domain::events::CatalogEvent;
use crate::models::display::DisplayItem;
use crate::services::{CatalogController, FavoritesController};
use crate::state::AppState;

fn print_keys() {
    println!();
    println!("Keys:");
    println!("  n            next page");
    println!("  p            previous page");
    println!("  s <term>     search (s alone goes back to the top list)");
    println!("  r            back to the top list");
    println!("  f <id>       toggle favorite");
    println!("  i <id>       show details");
    println!("  l            list favorites");
    println!("  q            quit");
}

/// Redraws whenever the result set changes, and reports failures and
/// rejected presses from the event channel.
fn spawn_renderer(
    catalog: &CatalogController,
    favorites: &FavoritesController,
) -> tokio::task::JoinHandle<()> {
    let mut results = catalog.subscribe();
    let mut events = catalog.events();
    let favorites = favorites.clone();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                changed = results.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let set = results.borrow_and_update().clone();
                    print_page(&set, &favorite_ids(&favorites));
                }
                event = events.recv() => match event {
                    Ok(CatalogEvent::LoadFailed { page, message, .. }) => {
                        println!("⚠ Failed to load page {page}: {message}");
                    }
                    Ok(CatalogEvent::Rejected { reason }) => println!("{}", describe_reject(&reason)),
                    Ok(event) => debug!(?event, "Catalog event"),
                    Err(RecvError::Lagged(skipped)) => debug!("Renderer skipped {} events", skipped),
                    Err(RecvError::Closed) => break,
                },
            }
        }
    })
}

/// Flips the favorite state of `id` and returns whether it is a favorite now.
/// Failures are reported on screen and leave the browser running.
async fn toggle_favorite(state: &AppState, id: AnimeId) -> Option<bool> {
    let (title, outcome) = match state.resolver.resolve(id).await {
        Some(DisplayItem::Remote(item)) => {
            let outcome = state.favorites.toggle(&item).outcome().await;
            (item.display_title().to_string(), outcome)
        }
        Some(DisplayItem::Favorite(record)) => {
            let outcome = state.favorites.delete(&record).outcome().await.map(|_| false);
            (record.display_title().to_string(), outcome)
        }
        None => {
            println!("Anime with ID {id} not found.");
            return None;
        }
    };

    match outcome {
        Ok(true) => {
            println!("★ Saved {title}");
            Some(true)
        }
        Ok(false) => {
            println!("Removed {title} from favorites");
            Some(false)
        }
        Err(e) => {
            warn!("Failed to toggle favorite {}: {}", id, e);
            println!("⚠ Could not update favorites: {e}");
            None
        }
    }
}

fn parse_id(arg: &str) -> Option<AnimeId> {
    let id = arg.parse().ok();
    if id.is_none() {
        println!("Expected a numeric anime ID, got '{arg}'");
    }
    id
}

pub async fn cmd_browse(state: &AppState) -> anyhow::Result<()> {
    let catalog = state.catalog.clone();
    let renderer = spawn_renderer(&catalog, &state.favorites);

    print_keys();

    // Loads run in the background so keys stay responsive; the renderer
    // shows whatever the controller applies.
    {
        let catalog = catalog.clone();
        tokio::spawn(async move { catalog.load_top(1).await });
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (key, arg) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(k, a)| (k, a.trim()));

        match key {
            "" => {}
            "n" => {
                let catalog = catalog.clone();
                tokio::spawn(async move { catalog.next_page().await });
            }
            "p" => {
                let catalog = catalog.clone();
                tokio::spawn(async move { catalog.previous_page().await });
            }
            "s" if arg.is_empty() => {
                let catalog = catalog.clone();
                tokio::spawn(async move { catalog.reset().await });
            }
            "s" => {
                let catalog = catalog.clone();
                let term = arg.to_string();
                tokio::spawn(async move { catalog.search(&term, 1).await });
            }
            "r" => {
                let catalog = catalog.clone();
                tokio::spawn(async move { catalog.reset().await });
            }
            "f" => {
                if let Some(id) = parse_id(arg) {
                    toggle_favorite(state, id).await;
                }
            }
            "i" => {
                if let Some(id) = parse_id(arg) {
                    match state.resolver.resolve(id).await {
                        Some(item) => {
                            let is_favorite = state.favorites.is_favorite(id).await;
                            print_detail(&item, is_favorite);
                        }
                        None => println!("Anime with ID {id} not found."),
                    }
                }
            }
            "l" => {
                let records = state.favorites.favorites().borrow().clone();
                super::render::print_favorites(&records);
            }
            "q" | "quit" | "exit" => break,
            _ => print_keys(),
        }
    }

    renderer.abort();
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sea_orm::ConnectionTrait;

    use super::*;
    use crate::clients::{CatalogClient, CatalogError};
    use crate::config::Config;
    use crate::db::Store;
    use crate::models::catalog::{CatalogItem, PageResult};

    struct SingleItemCatalog;

    #[async_trait::async_trait]
    impl CatalogClient for SingleItemCatalog {
        async fn fetch_top(&self, _page: u32) -> Result<PageResult, CatalogError> {
            Err(CatalogError::Network("offline".to_string()))
        }

        async fn search(&self, _query: &str, _page: u32) -> Result<PageResult, CatalogError> {
            Err(CatalogError::Network("offline".to_string()))
        }

        async fn fetch_anime(&self, id: AnimeId) -> Result<Option<CatalogItem>, CatalogError> {
            Ok(Some(CatalogItem {
                id,
                title: "Serial Experiments Lain".to_string(),
                title_english: None,
                image_url: String::new(),
                large_image_url: None,
                kind: None,
                episodes: None,
                score: None,
                synopsis: None,
                status: None,
                aired_from: None,
                aired_to: None,
                genres: Vec::new(),
                studios: Vec::new(),
            }))
        }
    }

    async fn app() -> (AppState, Store) {
        let store = Store::in_memory().await.unwrap();
        let client = Arc::new(SingleItemCatalog);
        let state = AppState::with_parts(&Config::default(), store.clone(), client)
            .await
            .unwrap();
        (state, store)
    }

    #[tokio::test]
    async fn toggle_flips_favorite() {
        let (state, _store) = app().await;
        let id = AnimeId::new(339);

        assert_eq!(toggle_favorite(&state, id).await, Some(true));
        assert_eq!(toggle_favorite(&state, id).await, Some(false));
    }

    #[tokio::test]
    async fn store_failure_during_toggle_is_reported_not_returned() {
        let (state, store) = app().await;
        store
            .conn
            .execute_unprepared("DROP TABLE favorite_anime")
            .await
            .unwrap();

        assert_eq!(toggle_favorite(&state, AnimeId::new(339)).await, None);
        // The controller keeps serving requests afterwards.
        assert!(!state.favorites.is_favorite(AnimeId::new(339)).await);
    }
}
