use std::sync::Arc;

use anyhow::Context;

use crate::clients::CatalogClient;
use crate::clients::jikan::JikanClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    CatalogController, FavoritesController, FavoritesStore, ItemResolver, SeaOrmFavoritesStore,
};

/// Everything a screen needs, constructed once and passed down explicitly.
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogController,

    pub favorites: FavoritesController,

    pub resolver: ItemResolver,
}

impl AppState {
    /// Opens the configured database and talks to the configured Jikan endpoint.
    pub async fn from_config(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await
        .with_context(|| format!("Failed to open database {}", config.general.database_path))?;

        let client: Arc<dyn CatalogClient> = Arc::new(JikanClient::new(config.jikan.clone())?);

        Self::with_parts(&config, store, client).await
    }

    /// Wires the controllers around an already opened store and any catalog client.
    pub async fn with_parts(
        config: &Config,
        store: Store,
        client: Arc<dyn CatalogClient>,
    ) -> anyhow::Result<Self> {
        let favorites_store: Arc<dyn FavoritesStore> = Arc::new(
            SeaOrmFavoritesStore::open(store)
                .await
                .context("Failed to load favorites")?,
        );

        let favorites = FavoritesController::new(favorites_store);
        let catalog = CatalogController::new(
            Arc::clone(&client),
            config.browse.mode,
            config.browse.event_buffer_size,
        );
        let resolver = ItemResolver::new(catalog.clone(), favorites.clone(), client);

        Ok(Self {
            catalog,
            favorites,
            resolver,
        })
    }
}
