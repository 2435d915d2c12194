//! `SeaORM` implementation of the `FavoritesStore` trait.
//!
//! `SQLite` has no change feed, so the store republishes the whole table to
//! its watch channel after each successful write.

use crate::db::Store;
use crate::domain::AnimeId;
use crate::models::favorite::FavoriteRecord;
use crate::services::favorites_store::{FavoritesError, FavoritesStore};
use tokio::sync::watch;
use tracing::{debug, info, warn};

pub struct SeaOrmFavoritesStore {
    store: Store,
    snapshot: watch::Sender<Vec<FavoriteRecord>>,
}

impl SeaOrmFavoritesStore {
    /// Opens the store and seeds the live view from the table.
    pub async fn open(store: Store) -> Result<Self, FavoritesError> {
        let initial = store.list_favorites().await?;
        info!("Loaded {} favorites", initial.len());
        let (snapshot, _) = watch::channel(initial);
        Ok(Self { store, snapshot })
    }

    /// Re-reads the table into the live view. The write before it has already
    /// committed, so a failed re-read leaves the previous snapshot in place
    /// rather than failing that write.
    async fn publish(&self) {
        match self.store.list_favorites().await {
            Ok(all) => {
                debug!("Publishing {} favorites", all.len());
                self.snapshot.send_replace(all);
            }
            Err(e) => warn!("Failed to refresh favorites snapshot: {}", e),
        }
    }
}

#[async_trait::async_trait]
impl FavoritesStore for SeaOrmFavoritesStore {
    async fn upsert(&self, record: &FavoriteRecord) -> Result<(), FavoritesError> {
        self.store.upsert_favorite(record).await?;
        self.publish().await;
        Ok(())
    }

    async fn delete_by_id(&self, id: AnimeId) -> Result<bool, FavoritesError> {
        let removed = self.store.remove_favorite(id).await?;
        if removed {
            self.publish().await;
        }
        Ok(removed)
    }

    async fn get_by_id(&self, id: AnimeId) -> Result<Option<FavoriteRecord>, FavoritesError> {
        Ok(self.store.get_favorite(id).await?)
    }

    async fn clear_all(&self) -> Result<u64, FavoritesError> {
        let removed = self.store.clear_favorites().await?;
        self.publish().await;
        Ok(removed)
    }

    fn observe_all(&self) -> watch::Receiver<Vec<FavoriteRecord>> {
        self.snapshot.subscribe()
    }
}
