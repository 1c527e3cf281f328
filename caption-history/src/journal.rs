//! Local history journal stored as newline-delimited JSON.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use caption_primitives::GenerationLogEntry;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::warn;

use crate::HistoryResult;
use crate::store::{HistoryStore, newest_first};

/// File-backed history store, one JSON row per line.
pub struct FileHistoryStore {
    path: PathBuf,
    file: Mutex<tokio::fs::File>,
}

impl std::fmt::Debug for FileHistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileHistoryStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl FileHistoryStore {
    /// Opens (or creates) a journal file at the provided path.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors encountered while preparing the file.
    pub async fn open(path: impl Into<PathBuf>) -> HistoryResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Returns the underlying path of the journal file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl HistoryStore for FileHistoryStore {
    fn backend(&self) -> &'static str {
        "file"
    }

    async fn append(&self, entry: &GenerationLogEntry) -> HistoryResult<()> {
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');
        let mut guard = self.file.lock().await;
        guard.write_all(&line).await?;
        guard.flush().await?;
        Ok(())
    }

    async fn latest(&self, limit: usize) -> HistoryResult<Vec<GenerationLogEntry>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let data = {
            let _guard = self.file.lock().await;
            fs::read(&self.path).await?
        };

        let mut entries = Vec::new();
        for (index, chunk) in data
            .split(|byte| *byte == b'\n')
            .filter(|chunk| !chunk.is_empty())
            .enumerate()
        {
            // A torn final line from an interrupted write should not hide the rest.
            match serde_json::from_slice::<GenerationLogEntry>(chunk) {
                Ok(entry) => entries.push(entry),
                Err(err) => warn!(line = index + 1, error = %err, "skipping unreadable history line"),
            }
        }

        Ok(newest_first(entries, limit))
    }
}
