//! Shared transport trait and error type.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Result alias used by completion transports.
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Error type shared by transport implementations.
///
/// The rendered message is what callers inspect when classifying failures,
/// so variants keep the provider's own wording in `reason`.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Transport is misconfigured or missing credentials.
    #[error("adapter not configured: {reason}")]
    Configuration {
        /// Additional context for the failure.
        reason: String,
    },

    /// The supplied request was invalid for the target service.
    #[error("invalid completion request: {reason}")]
    InvalidRequest {
        /// Reason describing why the request could not be processed.
        reason: String,
    },

    /// Transport-level failures (network, TLS, timeouts).
    #[error("adapter transport error: {reason}")]
    Transport {
        /// Additional context about the error.
        reason: String,
    },

    /// The provider rejected the request due to rate limiting.
    #[error("adapter rate limited (retry after {retry_after:?}): {reason}")]
    RateLimited {
        /// Suggested delay before retrying.
        retry_after: Option<Duration>,
        /// Provider message.
        reason: String,
    },

    /// The provider returned an error status or a malformed body.
    #[error("adapter response error: {reason}")]
    Response {
        /// Additional context about the response failure.
        reason: String,
    },
}

impl AdapterError {
    /// Convenience constructor for invalid requests.
    #[must_use]
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for configuration issues.
    #[must_use]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for transport failures.
    #[must_use]
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for response failures.
    #[must_use]
    pub fn response(reason: impl Into<String>) -> Self {
        Self::Response {
            reason: reason.into(),
        }
    }
}

/// A text-completion service reachable by model identifier.
///
/// Implementations perform exactly one request per call and never retry;
/// fallback across models is the caller's concern.
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    /// Short provider name used in logs (e.g. `"gemini"`).
    fn provider(&self) -> &'static str;

    /// Returns `true` when a credential is available for requests.
    fn has_credentials(&self) -> bool;

    /// Sends `prompt` to `model` and returns the raw completion text.
    async fn complete(&self, model: &str, prompt: &str) -> AdapterResult<String>;
}
