use std::collections::HashSet;
use std::sync::Arc;

use nexplay_core::types::{MediaType, Title};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use crate::entry::WatchListEntry;
use crate::storage::Storage;

/// Record name the list is persisted under.
pub const DEFAULT_KEY: &str = "nexplay-my-list";

enum WriterCommand {
    Write(String),
    Flush(oneshot::Sender<()>),
}

/// The user's watch-list: unique by `(id, media_type)`, newest first.
///
/// Mutations apply in memory immediately and are queued to a background
/// writer in order. A failed write is logged and never undoes the mutation.
pub struct WatchList {
    entries: Vec<WatchListEntry>,
    key: String,
    writer: mpsc::UnboundedSender<WriterCommand>,
}

impl WatchList {
    /// Load the list stored under [`DEFAULT_KEY`]. Must run inside a tokio runtime.
    pub async fn open(storage: Arc<dyn Storage>) -> Self {
        Self::open_with_key(storage, DEFAULT_KEY).await
    }

    pub async fn open_with_key(storage: Arc<dyn Storage>, key: &str) -> Self {
        let entries = load(storage.as_ref(), key).await;
        info!(key, entries = entries.len(), "watch-list loaded");

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(storage, key.to_string(), rx));

        Self {
            entries,
            key: key.to_string(),
            writer: tx,
        }
    }

    /// Add a title at the front. Returns `false` if it was already listed.
    pub fn add(&mut self, title: &Title) -> bool {
        if self.contains(title.id(), title.media_type()) {
            return false;
        }
        self.entries.insert(0, WatchListEntry::from(title));
        self.persist();
        true
    }

    /// Remove the entry for `(id, media_type)`. Returns `false` if absent.
    pub fn remove(&mut self, id: u64, media_type: MediaType) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| !e.matches(id, media_type));
        if self.entries.len() == before {
            return false;
        }
        self.persist();
        true
    }

    pub fn contains(&self, id: u64, media_type: MediaType) -> bool {
        self.entries.iter().any(|e| e.matches(id, media_type))
    }

    pub fn get(&self, id: u64, media_type: MediaType) -> Option<&WatchListEntry> {
        self.entries.iter().find(|e| e.matches(id, media_type))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    /// Entries, most recently added first.
    pub fn list(&self) -> &[WatchListEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Wait until every write queued so far has been attempted.
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        if self.writer.send(WriterCommand::Flush(tx)).is_ok() {
            let _ = rx.await;
        }
    }

    fn persist(&self) {
        let json = match serde_json::to_string(&self.entries) {
            Ok(json) => json,
            Err(e) => {
                error!(key = %self.key, error = %e, "failed to serialize watch-list");
                return;
            }
        };
        if self.writer.send(WriterCommand::Write(json)).is_err() {
            error!(key = %self.key, "watch-list writer is gone, change not persisted");
        }
    }
}

impl std::fmt::Debug for WatchList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchList")
            .field("key", &self.key)
            .field("entries", &self.entries.len())
            .finish()
    }
}

async fn run_writer(
    storage: Arc<dyn Storage>,
    key: String,
    mut rx: mpsc::UnboundedReceiver<WriterCommand>,
) {
    while let Some(cmd) = rx.recv().await {
        match cmd {
            WriterCommand::Write(json) => {
                if let Err(e) = storage.set(&key, &json).await {
                    error!(key = %key, error = %e, "failed to persist watch-list");
                }
            }
            WriterCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!(key = %key, "watch-list writer stopped");
}

async fn load(storage: &dyn Storage, key: &str) -> Vec<WatchListEntry> {
    match storage.get(key).await {
        Ok(Some(raw)) => decode(&raw).unwrap_or_else(|reason| {
            warn!(key, reason = %reason, "discarding unreadable watch-list");
            Vec::new()
        }),
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!(key, error = %e, "failed to read watch-list, starting empty");
            Vec::new()
        }
    }
}

/// Decode a persisted list. Anything that is not a JSON array is rejected;
/// malformed or duplicate elements inside an array are dropped.
pub fn decode(raw: &str) -> Result<Vec<WatchListEntry>, String> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    let serde_json::Value::Array(items) = value else {
        return Err("record is not an array".to_string());
    };

    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<WatchListEntry>(item) {
            Ok(entry) => {
                if seen.insert(entry.key()) {
                    entries.push(entry);
                }
            }
            Err(e) => warn!(index = i, error = %e, "skipping malformed watch-list entry"),
        }
    }
    Ok(entries)
}
