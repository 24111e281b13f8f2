use std::collections::HashMap;
use std::sync::Mutex;

use sqlx::SqlitePool;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),
}

/// SQLite result code for a full database or disk.
const SQLITE_FULL: &str = "13";

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.code().as_deref() == Some(SQLITE_FULL) => {
                Self::QuotaExceeded(db.message().to_string())
            }
            _ => Self::Backend(e.to_string()),
        }
    }
}

/// Durable string key-value storage, the local analogue of browser storage.
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Process-local storage. Contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with one record.
    pub fn with_value(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage.put(key, value);
        storage
    }

    /// Synchronous read, handy when inspecting what was persisted.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn put(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
    }
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.peek(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.put(key, value);
        Ok(())
    }
}

/// Storage backed by the `kv_store` table of a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) the database at `path` and migrate it.
    pub async fn open(path: &str) -> Result<Self, StorageError> {
        let pool = nexplay_db::open(path)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        Ok(Self::new(pool))
    }
}

#[async_trait::async_trait]
impl Storage for SqliteStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(nexplay_db::repo::kv::get(&self.pool, key).await?)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Ok(nexplay_db::repo::kv::set(&self.pool, key, value).await?)
    }
}
