use std::sync::Arc;

use nexplay_core::types::{MediaType, Movie, Show, Title};
use nexplay_watchlist::{DEFAULT_KEY, SqliteStorage, Storage, StorageError, WatchList};

fn movie(id: u64, title: &str) -> Title {
    Title::Movie(Movie {
        id,
        title: title.into(),
        poster_path: Some(format!("/{id}.jpg")),
        ..Default::default()
    })
}

fn show(id: u64, name: &str) -> Title {
    Title::Tv(Show {
        id,
        name: name.into(),
        ..Default::default()
    })
}

#[tokio::test]
async fn list_survives_reopen_on_same_database() {
    let storage = Arc::new(SqliteStorage::open(":memory:").await.unwrap());

    let mut list = WatchList::open(storage.clone()).await;
    list.add(&movie(27205, "Inception"));
    list.add(&show(1396, "Breaking Bad"));
    list.add(&movie(27205, "Inception"));
    list.flush().await;

    let reopened = WatchList::open(storage.clone()).await;
    assert_eq!(reopened.len(), 2);
    assert_eq!(reopened.list()[0].key(), (1396, MediaType::Tv));
    assert_eq!(reopened.list()[1].poster_path.as_deref(), Some("/27205.jpg"));
    assert_eq!(reopened.list(), list.list());
}

#[tokio::test]
async fn corrupt_database_record_starts_empty() {
    let storage = Arc::new(SqliteStorage::open(":memory:").await.unwrap());
    storage.set(DEFAULT_KEY, "not-json{").await.unwrap();

    let mut list = WatchList::open(storage.clone()).await;
    assert!(list.is_empty());

    // The next mutation overwrites the corrupt record.
    list.add(&movie(1, "A"));
    list.flush().await;
    let raw = storage.get(DEFAULT_KEY).await.unwrap().unwrap();
    assert!(raw.starts_with('['));
}

#[tokio::test]
async fn separate_keys_are_separate_lists() {
    let storage = Arc::new(SqliteStorage::open(":memory:").await.unwrap());

    let mut alice = WatchList::open_with_key(storage.clone(), "profile-a").await;
    let mut bob = WatchList::open_with_key(storage.clone(), "profile-b").await;
    alice.add(&movie(1, "A"));
    bob.add(&show(2, "B"));
    alice.flush().await;
    bob.flush().await;

    let alice = WatchList::open_with_key(storage.clone(), "profile-a").await;
    assert_eq!(alice.len(), 1);
    assert!(alice.contains(1, MediaType::Movie));
    assert!(!alice.contains(2, MediaType::Tv));
}

#[tokio::test]
async fn full_database_reports_quota_exceeded() {
    let pool = nexplay_db::open(":memory:").await.unwrap();
    sqlx::query("PRAGMA max_page_count = 8")
        .execute(&pool)
        .await
        .unwrap();
    let storage = SqliteStorage::new(pool);

    let oversized = "x".repeat(256 * 1024);
    let err = storage.set(DEFAULT_KEY, &oversized).await.unwrap_err();
    assert!(matches!(err, StorageError::QuotaExceeded(_)), "got {err:?}");
}
