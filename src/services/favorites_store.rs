//! Persistence port for bookmarked items.
//!
//! The favorites controller only talks to this trait, so tests and embedders
//! can swap the SQLite table for anything with the same read/write contract.

use crate::domain::AnimeId;
use crate::models::favorite::FavoriteRecord;
use thiserror::Error;
use tokio::sync::watch;

/// Errors raised while reading or writing favorites.
///
/// A missing favorite is not an error; lookups return `Option`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FavoritesError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Favorites worker has stopped")]
    WorkerStopped,
}

impl From<sea_orm::DbErr> for FavoritesError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

/// Keyed table of favorites with a live view of its contents.
#[async_trait::async_trait]
pub trait FavoritesStore: Send + Sync {
    /// Inserts or fully replaces the record with the same id.
    ///
    /// # Errors
    ///
    /// Returns [`FavoritesError::Database`] on storage failures.
    async fn upsert(&self, record: &FavoriteRecord) -> Result<(), FavoritesError>;

    /// Removes the record with `id`. Returns whether a row existed.
    ///
    /// # Errors
    ///
    /// Returns [`FavoritesError::Database`] on storage failures.
    async fn delete_by_id(&self, id: AnimeId) -> Result<bool, FavoritesError>;

    async fn get_by_id(&self, id: AnimeId) -> Result<Option<FavoriteRecord>, FavoritesError>;

    /// Removes everything. Returns the number of rows deleted.
    async fn clear_all(&self) -> Result<u64, FavoritesError>;

    /// Live snapshot of every record, in insertion order.
    ///
    /// The receiver starts at the current contents and sees a new value after
    /// every successful write.
    fn observe_all(&self) -> watch::Receiver<Vec<FavoriteRecord>>;
}
