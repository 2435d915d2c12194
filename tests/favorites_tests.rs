//! Integration tests for favorites persistence and the favorites controller.

mod common;

use std::sync::Arc;

use animeshelf::constants::NOT_AVAILABLE;
use animeshelf::db::Store;
use animeshelf::domain::AnimeId;
use animeshelf::services::{FavoritesController, SeaOrmFavoritesStore};
use common::item;
use futures::StreamExt;

async fn open(store: Store) -> FavoritesController {
    let favorites = SeaOrmFavoritesStore::open(store)
        .await
        .expect("Failed to open favorites store");
    FavoritesController::new(Arc::new(favorites))
}

async fn controller() -> FavoritesController {
    open(Store::in_memory().await.expect("Failed to open database")).await
}

fn ids(favorites: &FavoritesController) -> Vec<i32> {
    favorites
        .favorites()
        .borrow()
        .iter()
        .map(|record| record.id.value())
        .collect()
}

#[tokio::test]
async fn saved_item_is_a_favorite_until_deleted() {
    let favorites = controller().await;
    let cowboy = item(1, "Cowboy Bebop");

    favorites.save(&cowboy).outcome().await.unwrap();
    assert!(favorites.is_favorite(cowboy.id).await);

    let record = favorites.get(cowboy.id).await.unwrap();
    assert_eq!(record.title, "Cowboy Bebop");

    assert!(favorites.delete(&record).outcome().await.unwrap());
    assert!(!favorites.is_favorite(cowboy.id).await);
    assert!(favorites.get(cowboy.id).await.is_none());
}

#[tokio::test]
async fn saving_same_id_twice_keeps_one_record_with_latest_fields() {
    let favorites = controller().await;

    favorites.save(&item(7, "First")).outcome().await.unwrap();
    favorites.save(&item(7, "Second")).outcome().await.unwrap();

    let all = favorites.favorites().borrow().clone();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].title, "Second");
}

#[tokio::test]
async fn deleting_missing_record_is_not_an_error() {
    let favorites = controller().await;

    let removed = favorites.remove(AnimeId::new(42)).outcome().await.unwrap();
    assert!(!removed);
}

#[tokio::test]
async fn writes_apply_in_call_order_without_awaiting() {
    let favorites = controller().await;

    // Tickets dropped on purpose; the queue still applies them in order.
    let _ = favorites.save(&item(1, "Old"));
    let _ = favorites.remove(AnimeId::new(1));
    favorites.save(&item(1, "New")).outcome().await.unwrap();

    let record = favorites.get(AnimeId::new(1)).await.unwrap();
    assert_eq!(record.title, "New");

    let _ = favorites.save(&item(2, "Gone"));
    let removed = favorites.remove(AnimeId::new(2)).outcome().await.unwrap();
    assert!(removed);
    assert!(!favorites.is_favorite(AnimeId::new(2)).await);
}

#[tokio::test]
async fn reads_observe_writes_queued_before_them() {
    let favorites = controller().await;

    let _ = favorites.save(&item(3, "Queued"));
    assert!(favorites.is_favorite(AnimeId::new(3)).await);
}

#[tokio::test]
async fn toggle_flips_membership() {
    let favorites = controller().await;
    let trigun = item(5, "Trigun");

    assert!(favorites.toggle(&trigun).outcome().await.unwrap());
    assert!(favorites.is_favorite(trigun.id).await);

    assert!(!favorites.toggle(&trigun).outcome().await.unwrap());
    assert!(!favorites.is_favorite(trigun.id).await);
}

#[tokio::test]
async fn clear_removes_everything() {
    let favorites = controller().await;
    for id in 1..=3 {
        favorites.save(&item(id, "x")).outcome().await.unwrap();
    }

    assert_eq!(favorites.clear().outcome().await.unwrap(), 3);
    assert!(favorites.favorites().borrow().is_empty());
    assert_eq!(favorites.clear().outcome().await.unwrap(), 0);
}

#[tokio::test]
async fn list_keeps_insertion_order_across_upserts() {
    let favorites = controller().await;

    for id in [30, 10, 20] {
        favorites.save(&item(id, "x")).outcome().await.unwrap();
    }
    assert_eq!(ids(&favorites), vec![30, 10, 20]);

    favorites.save(&item(30, "renamed")).outcome().await.unwrap();
    assert_eq!(ids(&favorites), vec![30, 10, 20]);
    assert_eq!(favorites.favorites().borrow()[0].title, "renamed");
}

#[tokio::test]
async fn favorites_stream_emits_after_each_write() {
    let favorites = controller().await;
    let mut stream = Box::pin(favorites.favorites_stream());

    assert!(stream.next().await.unwrap().is_empty());

    favorites.save(&item(9, "Akira")).outcome().await.unwrap();
    let after_save = stream.next().await.unwrap();
    assert_eq!(after_save.len(), 1);
    assert_eq!(after_save[0].title, "Akira");

    favorites.remove(AnimeId::new(9)).outcome().await.unwrap();
    assert!(stream.next().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_fields_are_stored_with_defaults() {
    let favorites = controller().await;
    let mut sparse = item(11, "Sparse");
    sparse.score = None;
    sparse.episodes = None;
    sparse.synopsis = None;
    sparse.genres.clear();
    sparse.studios.clear();

    favorites.save(&sparse).outcome().await.unwrap();
    let record = favorites.get(sparse.id).await.unwrap();

    assert_eq!(record.episodes, 0);
    assert!(record.score.abs() < f64::EPSILON);
    assert_eq!(record.synopsis, NOT_AVAILABLE);
    assert_eq!(record.genres, NOT_AVAILABLE);
    assert_eq!(record.studios, NOT_AVAILABLE);
}

#[tokio::test]
async fn favorites_survive_reopening_the_database() {
    let db_path = std::env::temp_dir().join(format!(
        "animeshelf-favorites-test-{}.db",
        uuid::Uuid::new_v4()
    ));
    let url = format!("sqlite:{}", db_path.display());

    {
        let favorites = open(Store::new(&url).await.unwrap()).await;
        favorites.save(&item(1, "Kept")).outcome().await.unwrap();
        favorites.save(&item(2, "Also kept")).outcome().await.unwrap();
    }

    let reopened = open(Store::new(&url).await.unwrap()).await;
    assert_eq!(ids(&reopened), vec![1, 2]);
    assert_eq!(reopened.favorites().borrow()[0].title, "Kept");

    let _ = std::fs::remove_file(&db_path);
}
