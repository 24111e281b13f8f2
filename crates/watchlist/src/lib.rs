//! Locally persisted, deduplicated list of titles a user wants to revisit.

pub mod entry;
pub mod storage;
pub mod store;

pub use entry::WatchListEntry;
pub use storage::{MemoryStorage, SqliteStorage, Storage, StorageError};
pub use store::{DEFAULT_KEY, WatchList};
