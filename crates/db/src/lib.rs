pub mod migrate;
pub mod repo;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Create a SQLite connection pool with WAL mode enabled.
pub async fn connect(db_path: &str) -> Result<SqlitePool, sqlx::Error> {
    let in_memory = db_path.contains(":memory:");

    // Ensure parent directory exists
    if !in_memory {
        if let Some(parent) = Path::new(db_path).parent() {
            std::fs::create_dir_all(parent).ok();
        }
    }

    let opts = SqliteConnectOptions::from_str(db_path)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

    // A single connection keeps an in-memory database alive and shared.
    let max_connections = if in_memory { 1 } else { 5 };

    let mut pool_opts = SqlitePoolOptions::new().max_connections(max_connections);
    if in_memory {
        pool_opts = pool_opts.idle_timeout(None).max_lifetime(None);
    }
    let pool = pool_opts.connect_with(opts).await?;

    Ok(pool)
}

/// Connect and bring the schema up to date.
pub async fn open(db_path: &str) -> Result<SqlitePool, DbError> {
    let pool = connect(db_path).await?;
    migrate::run(&pool).await?;
    Ok(pool)
}
