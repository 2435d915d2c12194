use crate::domain::AnimeId;
use crate::models::favorite::FavoriteRecord;
use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    /// In-memory database. Pinned to a single connection so every query sees
    /// the same database.
    pub async fn in_memory() -> Result<Self> {
        Self::with_pool_options("sqlite::memory:", 1, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite:").trim_start_matches("//");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(if in_memory { 1 } else { max_connections })
            .min_connections(min_connections.min(max_connections))
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        // Recycling the only connection of an in-memory database would drop it.
        if !in_memory {
            opt.idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
        }

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    fn favorites_repo(&self) -> repositories::favorites::FavoritesRepository {
        repositories::favorites::FavoritesRepository::new(self.conn.clone())
    }

    pub async fn upsert_favorite(&self, record: &FavoriteRecord) -> Result<(), DbErr> {
        self.favorites_repo().upsert(record).await
    }

    pub async fn remove_favorite(&self, id: AnimeId) -> Result<bool, DbErr> {
        self.favorites_repo().delete(id).await
    }

    pub async fn get_favorite(&self, id: AnimeId) -> Result<Option<FavoriteRecord>, DbErr> {
        self.favorites_repo().get(id).await
    }

    pub async fn list_favorites(&self) -> Result<Vec<FavoriteRecord>, DbErr> {
        self.favorites_repo().list_all().await
    }

    pub async fn clear_favorites(&self) -> Result<u64, DbErr> {
        self.favorites_repo().clear().await
    }
}
