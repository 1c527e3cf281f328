//! Shared error definitions for caption primitives.

use thiserror::Error;

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while constructing primitive types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The tone identifier is not part of the supported set.
    #[error("unknown tone `{tone}`")]
    UnknownTone {
        /// The offending identifier string.
        tone: String,
    },

    /// The selected file is not recognised as a video.
    #[error("`{name}` is not a supported video file")]
    UnsupportedVideo {
        /// File name supplied by the user.
        name: String,
    },

    /// A generation result failed validation.
    #[error("invalid generation result: {reason}")]
    InvalidResult {
        /// Human-readable reason for rejection.
        reason: String,
    },
}
