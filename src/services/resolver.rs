use std::sync::Arc;

use tracing::{debug, warn};

use crate::clients::CatalogClient;
use crate::domain::AnimeId;
use crate::models::display::DisplayItem;
use crate::services::catalog::CatalogController;
use crate::services::favorites::FavoritesController;

/// Turns an identity back into a displayable item.
///
/// Screens hand each other ids only. The item is re-read from the page
/// currently shown, then the favorites table, then the remote catalog.
#[derive(Clone)]
pub struct ItemResolver {
    catalog: CatalogController,
    favorites: FavoritesController,
    client: Arc<dyn CatalogClient>,
}

impl ItemResolver {
    #[must_use]
    pub const fn new(
        catalog: CatalogController,
        favorites: FavoritesController,
        client: Arc<dyn CatalogClient>,
    ) -> Self {
        Self {
            catalog,
            favorites,
            client,
        }
    }

    pub async fn resolve(&self, id: AnimeId) -> Option<DisplayItem> {
        if let Some(item) = self.catalog.find_item(id) {
            debug!("Resolved {} from the current page", id);
            return Some(DisplayItem::Remote(item));
        }

        if let Some(record) = self.favorites.get(id).await {
            debug!("Resolved {} from favorites", id);
            return Some(DisplayItem::Favorite(record));
        }

        match self.client.fetch_anime(id).await {
            Ok(Some(item)) => {
                debug!("Resolved {} from the remote catalog", id);
                Some(DisplayItem::Remote(item))
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Could not fetch anime {}: {}", id, e);
                None
            }
        }
    }
}
