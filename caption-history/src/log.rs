use std::sync::Arc;

use caption_primitives::GenerationLogEntry;
use tracing::{debug, error, warn};

use crate::store::HistoryStore;

/// Number of entries returned by [`HistoryLog::list_recent`].
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Best-effort front for an optional [`HistoryStore`].
///
/// History is diagnostic: no method here returns an error. Store failures are
/// logged and otherwise ignored.
#[derive(Clone, Default)]
pub struct HistoryLog {
    store: Option<Arc<dyn HistoryStore>>,
}

impl std::fmt::Debug for HistoryLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryLog")
            .field("backend", &self.store.as_ref().map(|store| store.backend()))
            .finish()
    }
}

impl HistoryLog {
    /// Logs into `store`.
    #[must_use]
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self { store: Some(store) }
    }

    /// A log with no store; appends are skipped and listings are empty.
    #[must_use]
    pub fn disabled() -> Self {
        Self { store: None }
    }

    /// Returns `true` when a store is attached.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    /// Records `entry`, swallowing every failure.
    pub async fn append(&self, entry: &GenerationLogEntry) {
        let Some(store) = &self.store else {
            warn!("history store not configured, skipping log save");
            return;
        };

        match store.append(entry).await {
            Ok(()) => debug!(backend = store.backend(), video = entry.video_name(), "saved generation log"),
            Err(err) => error!(backend = store.backend(), error = %err, "error saving generation log"),
        }
    }

    /// Returns up to `limit` entries, newest first; empty on any failure.
    pub async fn list(&self, limit: usize) -> Vec<GenerationLogEntry> {
        let Some(store) = &self.store else {
            return Vec::new();
        };

        match store.latest(limit).await {
            Ok(entries) => entries,
            Err(err) => {
                error!(backend = store.backend(), error = %err, "error fetching generation history");
                Vec::new()
            }
        }
    }

    /// Returns the latest [`DEFAULT_HISTORY_LIMIT`] entries.
    pub async fn list_recent(&self) -> Vec<GenerationLogEntry> {
        self.list(DEFAULT_HISTORY_LIMIT).await
    }
}
