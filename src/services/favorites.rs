//! Favorites controller.
//!
//! Every read and write goes through one background task fed by an unbounded
//! queue. Enqueueing is synchronous, so operations apply in the order they were
//! called even when the caller never awaits the returned ticket.

use std::sync::Arc;

use futures::Stream;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, error, info};

use crate::domain::AnimeId;
use crate::models::catalog::CatalogItem;
use crate::models::favorite::FavoriteRecord;
use crate::services::favorites_store::{FavoritesError, FavoritesStore};
use crate::services::watch_stream;

type Reply<T> = oneshot::Sender<Result<T, FavoritesError>>;

enum Command {
    Save {
        record: FavoriteRecord,
        reply: Reply<()>,
    },
    Remove {
        id: AnimeId,
        reply: Reply<bool>,
    },
    Toggle {
        record: FavoriteRecord,
        reply: Reply<bool>,
    },
    Get {
        id: AnimeId,
        reply: Reply<Option<FavoriteRecord>>,
    },
    Clear {
        reply: Reply<u64>,
    },
}

/// Handle to the outcome of a queued favorites operation.
///
/// Dropping it does not cancel the operation.
#[must_use = "the operation runs regardless; await the ticket to observe its outcome"]
pub struct WriteTicket<T> {
    rx: oneshot::Receiver<Result<T, FavoritesError>>,
}

impl<T> WriteTicket<T> {
    /// Waits until the operation has been applied to the store.
    pub async fn outcome(self) -> Result<T, FavoritesError> {
        self.rx.await.unwrap_or(Err(FavoritesError::WorkerStopped))
    }
}

#[derive(Clone)]
pub struct FavoritesController {
    store: Arc<dyn FavoritesStore>,
    queue: mpsc::UnboundedSender<Command>,
}

impl FavoritesController {
    /// Creates the controller and spawns its worker onto the current runtime.
    ///
    /// The worker exits once every clone of the controller has been dropped.
    #[must_use]
    pub fn new(store: Arc<dyn FavoritesStore>) -> Self {
        let (queue, rx) = mpsc::unbounded_channel();
        tokio::spawn(worker(Arc::clone(&store), rx));
        Self { store, queue }
    }

    fn enqueue<T>(&self, build: impl FnOnce(Reply<T>) -> Command) -> WriteTicket<T> {
        let (reply, rx) = oneshot::channel();
        if self.queue.send(build(reply)).is_err() {
            error!("Favorites worker is gone; dropping request");
        }
        WriteTicket { rx }
    }

    /// Live list of every favorite.
    #[must_use]
    pub fn favorites(&self) -> watch::Receiver<Vec<FavoriteRecord>> {
        self.store.observe_all()
    }

    /// [`Self::favorites`] as a stream: the current list, then every change.
    pub fn favorites_stream(&self) -> impl Stream<Item = Vec<FavoriteRecord>> + Send + 'static {
        watch_stream(self.favorites())
    }

    /// Bookmarks `item`, replacing any previous record with the same id.
    pub fn save(&self, item: &CatalogItem) -> WriteTicket<()> {
        let record = FavoriteRecord::from(item);
        self.enqueue(|reply| Command::Save { record, reply })
    }

    /// Removes `record`. Resolves to whether it was present.
    pub fn delete(&self, record: &FavoriteRecord) -> WriteTicket<bool> {
        self.remove(record.id)
    }

    pub fn remove(&self, id: AnimeId) -> WriteTicket<bool> {
        self.enqueue(|reply| Command::Remove { id, reply })
    }

    /// Saves `item` if it is not a favorite yet, removes it otherwise.
    /// Resolves to whether the item is a favorite afterwards.
    pub fn toggle(&self, item: &CatalogItem) -> WriteTicket<bool> {
        let record = FavoriteRecord::from(item);
        self.enqueue(|reply| Command::Toggle { record, reply })
    }

    pub fn clear(&self) -> WriteTicket<u64> {
        self.enqueue(|reply| Command::Clear { reply })
    }

    /// Looks up a favorite after every previously queued write has applied.
    pub async fn get(&self, id: AnimeId) -> Option<FavoriteRecord> {
        match self
            .enqueue(|reply| Command::Get { id, reply })
            .outcome()
            .await
        {
            Ok(record) => record,
            Err(e) => {
                error!("Favorite lookup for {} failed: {}", id, e);
                self.snapshot_get(id)
            }
        }
    }

    /// Whether `id` is bookmarked. Drives the detail screen's toggle button.
    pub async fn is_favorite(&self, id: AnimeId) -> bool {
        self.get(id).await.is_some()
    }

    fn snapshot_get(&self, id: AnimeId) -> Option<FavoriteRecord> {
        self.store
            .observe_all()
            .borrow()
            .iter()
            .find(|record| record.id == id)
            .cloned()
    }
}

async fn worker(store: Arc<dyn FavoritesStore>, mut rx: mpsc::UnboundedReceiver<Command>) {
    debug!("Favorites worker started");

    while let Some(command) = rx.recv().await {
        match command {
            Command::Save { record, reply } => {
                let result = save(store.as_ref(), &record).await;
                let _ = reply.send(result);
            }
            Command::Remove { id, reply } => {
                let result = remove(store.as_ref(), id).await;
                let _ = reply.send(result);
            }
            Command::Toggle { record, reply } => {
                let result = toggle(store.as_ref(), &record).await;
                let _ = reply.send(result);
            }
            Command::Get { id, reply } => {
                let _ = reply.send(store.get_by_id(id).await);
            }
            Command::Clear { reply } => {
                let result = store.clear_all().await;
                match &result {
                    Ok(count) => info!("Cleared {} favorites", count),
                    Err(e) => error!("Failed to clear favorites: {}", e),
                }
                let _ = reply.send(result);
            }
        }
    }

    debug!("Favorites worker stopped");
}

async fn save(store: &dyn FavoritesStore, record: &FavoriteRecord) -> Result<(), FavoritesError> {
    metrics::counter!("animeshelf_favorites_writes_total", "op" => "save").increment(1);
    match store.upsert(record).await {
        Ok(()) => {
            info!("Saved favorite {} ({})", record.id, record.title);
            Ok(())
        }
        Err(e) => {
            error!("Failed to save favorite {}: {}", record.id, e);
            Err(e)
        }
    }
}

async fn remove(store: &dyn FavoritesStore, id: AnimeId) -> Result<bool, FavoritesError> {
    metrics::counter!("animeshelf_favorites_writes_total", "op" => "delete").increment(1);
    match store.delete_by_id(id).await {
        Ok(true) => {
            info!("Removed favorite {}", id);
            Ok(true)
        }
        Ok(false) => {
            debug!("Favorite {} was not stored; nothing to remove", id);
            Ok(false)
        }
        Err(e) => {
            error!("Failed to remove favorite {}: {}", id, e);
            Err(e)
        }
    }
}

async fn toggle(store: &dyn FavoritesStore, record: &FavoriteRecord) -> Result<bool, FavoritesError> {
    if store.get_by_id(record.id).await?.is_some() {
        remove(store, record.id).await.map(|_| false)
    } else {
        save(store, record).await.map(|()| true)
    }
}
