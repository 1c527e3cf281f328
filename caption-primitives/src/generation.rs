//! Generation requests, results, and history log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{Error, Result, ToneOption, VideoSelection};

/// Upper bound on hashtags kept per result.
pub const MAX_HASHTAGS: usize = 12;

/// A single user request for a caption.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    tone: ToneOption,
    #[serde(default, deserialize_with = "null_as_default")]
    context: String,
}

impl GenerationRequest {
    /// Creates a request; `context` may be empty.
    #[must_use]
    pub fn new(tone: ToneOption, context: impl Into<String>) -> Self {
        Self {
            tone,
            context: context.into(),
        }
    }

    /// Returns the requested tone.
    #[must_use]
    pub const fn tone(&self) -> ToneOption {
        self.tone
    }

    /// Returns the free-text context supplied by the user.
    #[must_use]
    pub fn context(&self) -> &str {
        &self.context
    }
}

/// Caption and hashtags produced for one request.
///
/// Results are immutable once built. The hashtag list never exceeds
/// [`MAX_HASHTAGS`] entries.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    caption: String,
    hashtags: Vec<String>,
    timestamp: DateTime<Utc>,
}

impl GenerationResult {
    /// Builds a result, keeping at most the first [`MAX_HASHTAGS`] hashtags.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidResult`] when the caption is blank.
    pub fn new(
        caption: impl Into<String>,
        mut hashtags: Vec<String>,
        timestamp: DateTime<Utc>,
    ) -> Result<Self> {
        let caption = caption.into();
        if caption.trim().is_empty() {
            return Err(Error::InvalidResult {
                reason: "caption must not be empty".into(),
            });
        }
        hashtags.truncate(MAX_HASHTAGS);

        Ok(Self {
            caption,
            hashtags,
            timestamp,
        })
    }

    /// Returns the caption text.
    #[must_use]
    pub fn caption(&self) -> &str {
        &self.caption
    }

    /// Returns hashtags in the order the model produced them.
    #[must_use]
    pub fn hashtags(&self) -> &[String] {
        &self.hashtags
    }

    /// Returns when the result was created.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Hashtags joined by single spaces.
    #[must_use]
    pub fn hashtag_line(&self) -> String {
        self.hashtags.join(" ")
    }

    /// Caption and hashtags ready to paste under a post.
    #[must_use]
    pub fn share_text(&self) -> String {
        format!("{}\n\n{}", self.caption, self.hashtag_line())
    }
}

/// A completed generation as recorded in the history store.
///
/// Field names match the `generation_logs` table columns.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GenerationLogEntry {
    video_name: String,
    tone: ToneOption,
    #[serde(default, deserialize_with = "null_as_default")]
    context: String,
    caption: String,
    #[serde(default, deserialize_with = "null_as_default")]
    hashtags: Vec<String>,
    created_at: DateTime<Utc>,
}

impl GenerationLogEntry {
    /// Records `result` as produced for `video` and `request`.
    #[must_use]
    pub fn new(
        video: &VideoSelection,
        request: &GenerationRequest,
        result: &GenerationResult,
    ) -> Self {
        Self {
            video_name: video.name().to_owned(),
            tone: request.tone(),
            context: request.context().to_owned(),
            caption: result.caption().to_owned(),
            hashtags: result.hashtags().to_vec(),
            created_at: result.timestamp(),
        }
    }

    /// Returns the name of the video the caption was written for.
    #[must_use]
    pub fn video_name(&self) -> &str {
        &self.video_name
    }

    /// Returns the requested tone.
    #[must_use]
    pub const fn tone(&self) -> ToneOption {
        self.tone
    }

    /// Returns the user-supplied context.
    #[must_use]
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Returns the generated caption.
    #[must_use]
    pub fn caption(&self) -> &str {
        &self.caption
    }

    /// Returns the generated hashtags.
    #[must_use]
    pub fn hashtags(&self) -> &[String] {
        &self.hashtags
    }

    /// Returns when the underlying result was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Hosted rows may carry `null` for optional columns.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
