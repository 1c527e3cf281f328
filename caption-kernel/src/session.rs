//! Interactive session state: selected video, in-flight guard, results.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use caption_history::HistoryLog;
use caption_primitives::{
    GenerationLogEntry, GenerationRequest, GenerationResult, ToneOption, VideoSelection,
};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::client::GenerationClient;
use crate::error::GenerationError;

/// Errors surfaced by [`GenerationSession::generate`].
#[derive(Debug, Error)]
pub enum SessionError {
    /// No video has been selected yet.
    #[error("Please upload a video first")]
    NoVideo,
    /// Another generation is still running.
    #[error("A generation is already in progress")]
    Busy,
    /// The generation itself failed.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Drives generations the way an interactive front end does.
///
/// At most one generation runs at a time. Successful results are kept newest
/// first and handed to the [`HistoryLog`] in a background task.
#[derive(Debug)]
pub struct GenerationSession {
    client: GenerationClient,
    history: HistoryLog,
    video: Mutex<Option<VideoSelection>>,
    in_flight: AtomicBool,
    results: Mutex<Vec<GenerationResult>>,
    pending_logs: Mutex<Vec<JoinHandle<()>>>,
}

impl GenerationSession {
    /// Creates a session with no video selected.
    #[must_use]
    pub fn new(client: GenerationClient, history: HistoryLog) -> Self {
        Self {
            client,
            history,
            video: Mutex::new(None),
            in_flight: AtomicBool::new(false),
            results: Mutex::new(Vec::new()),
            pending_logs: Mutex::new(Vec::new()),
        }
    }

    /// Selects the video subsequent generations are recorded against.
    pub fn select_video(&self, video: VideoSelection) {
        debug!(video = video.name(), media_type = video.media_type(), "video selected");
        *self.video.lock().unwrap_or_else(PoisonError::into_inner) = Some(video);
    }

    /// Returns the selected video, if any.
    #[must_use]
    pub fn video(&self) -> Option<VideoSelection> {
        self.video
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns `true` while a generation is running.
    #[must_use]
    pub fn is_generating(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Returns `true` when a video is selected and nothing is running.
    #[must_use]
    pub fn can_generate(&self) -> bool {
        self.video().is_some() && !self.is_generating()
    }

    /// Returns a snapshot of results, newest first.
    #[must_use]
    pub fn results(&self) -> Vec<GenerationResult> {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Generates a caption for the selected video.
    ///
    /// The in-flight flag is released on every exit path, including when the
    /// returned future is dropped early. History is written only for
    /// completed results and never delays or fails this call.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoVideo`] without a selection,
    /// [`SessionError::Busy`] while another call runs, and
    /// [`SessionError::Generation`] when the generation fails.
    pub async fn generate(
        &self,
        tone: ToneOption,
        context: &str,
    ) -> Result<GenerationResult, SessionError> {
        let video = self.video().ok_or(SessionError::NoVideo)?;
        let _guard = InFlightGuard::acquire(&self.in_flight).ok_or(SessionError::Busy)?;

        let request = GenerationRequest::new(tone, context);
        let result = self.client.generate_request(&request).await?;
        info!(
            video = video.name(),
            tone = %tone,
            hashtags = result.hashtags().len(),
            "generated caption"
        );

        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(0, result.clone());

        let entry = GenerationLogEntry::new(&video, &request, &result);
        self.spawn_log(entry);

        Ok(result)
    }

    /// Waits for background history writes started so far.
    pub async fn flush_history(&self) {
        let handles: Vec<_> = self
            .pending_logs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();
        for handle in handles {
            // Append never fails; a join error only means the task panicked.
            let _ = handle.await;
        }
    }

    fn spawn_log(&self, entry: GenerationLogEntry) {
        let history = self.history.clone();
        let handle = tokio::spawn(async move { history.append(&entry).await });

        let mut pending = self
            .pending_logs
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        pending.retain(|handle| !handle.is_finished());
        pending.push(handle);
    }
}

/// Holds the in-flight flag; dropping it releases the flag.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
