//! History store trait and an in-process implementation.

use async_trait::async_trait;
use caption_primitives::GenerationLogEntry;
use tokio::sync::RwLock;

use crate::HistoryResult;

/// Append-and-query store for completed generations.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Short backend name used in logs.
    fn backend(&self) -> &'static str;

    /// Appends a single entry.
    async fn append(&self, entry: &GenerationLogEntry) -> HistoryResult<()>;

    /// Returns up to `limit` entries ordered by `created_at`, newest first.
    async fn latest(&self, limit: usize) -> HistoryResult<Vec<GenerationLogEntry>>;
}

/// Sorts newest first; entries with equal timestamps keep the later append first.
pub(crate) fn newest_first(mut entries: Vec<GenerationLogEntry>, limit: usize) -> Vec<GenerationLogEntry> {
    entries.reverse();
    entries.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    entries.truncate(limit);
    entries
}

/// Volatile store kept in process memory.
#[derive(Debug, Default)]
pub struct InMemoryHistoryStore {
    entries: RwLock<Vec<GenerationLogEntry>>,
}

impl InMemoryHistoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns `true` if nothing has been appended.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn append(&self, entry: &GenerationLogEntry) -> HistoryResult<()> {
        self.entries.write().await.push(entry.clone());
        Ok(())
    }

    async fn latest(&self, limit: usize) -> HistoryResult<Vec<GenerationLogEntry>> {
        let snapshot = self.entries.read().await.clone();
        Ok(newest_first(snapshot, limit))
    }
}
