pub mod catalog;
pub use catalog::{CatalogController, ControllerState, LoadOutcome, Phase};

pub mod favorites;
pub use favorites::{FavoritesController, WriteTicket};

pub mod favorites_store;
pub use favorites_store::{FavoritesError, FavoritesStore};

pub mod favorites_store_impl;
pub use favorites_store_impl::SeaOrmFavoritesStore;

pub mod resolver;
pub use resolver::ItemResolver;

use futures::Stream;
use tokio::sync::watch;

/// Adapts a watch receiver into a stream that yields the current value first,
/// then one value per change. Intermediate values may be skipped.
pub(crate) fn watch_stream<T>(rx: watch::Receiver<T>) -> impl Stream<Item = T> + Send + 'static
where
    T: Clone + Send + Sync + 'static,
{
    futures::stream::unfold((rx, true), |(mut rx, first)| async move {
        if !first {
            rx.changed().await.ok()?;
        }
        let value = rx.borrow_and_update().clone();
        Some((value, (rx, false)))
    })
}
