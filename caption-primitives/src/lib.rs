//! Core shared types for caption and hashtag generation.

#![warn(missing_docs, clippy::pedantic)]

mod error;
mod generation;
mod tone;
mod video;

/// Error type and result alias shared across the workspace.
pub use error::{Error, Result};
/// Generation requests, results, and history log entries.
pub use generation::{GenerationLogEntry, GenerationRequest, GenerationResult, MAX_HASHTAGS};
/// The closed set of caption tones.
pub use tone::ToneOption;
/// The video a caption is generated for.
pub use video::VideoSelection;
