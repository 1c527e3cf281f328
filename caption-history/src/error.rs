//! Error types for history stores.

use serde_json::Error as SerdeError;
use thiserror::Error;

/// Errors emitted by history stores.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// The store configuration was invalid.
    #[error("invalid history configuration: {0}")]
    Configuration(String),
    /// Underlying I/O failure while reading or writing journal files.
    #[error("i/o error: {source}")]
    Io {
        /// Source [`std::io::Error`].
        #[from]
        source: std::io::Error,
    },
    /// Serialization or deserialization error.
    #[error("serialization error: {source}")]
    Serialization {
        /// Source [`serde_json::Error`].
        #[from]
        source: SerdeError,
    },
    /// Network failure talking to a hosted store.
    #[error("history transport error: {0}")]
    Transport(String),
    /// The hosted store answered with an error status.
    #[error("history store rejected request ({status}): {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, usually a PostgREST error document.
        body: String,
    },
}

/// Result type alias for history operations.
pub type HistoryResult<T> = Result<T, HistoryError>;
