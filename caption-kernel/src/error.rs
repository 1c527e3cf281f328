//! Caller-facing error taxonomy for caption generation.

use thiserror::Error;

/// Result alias for kernel operations.
pub type KernelResult<T> = Result<T, GenerationError>;

/// Failure of a single generation.
///
/// `Display` yields the one-line message shown to the user; `detail` keeps the
/// underlying cause for logs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// Missing or rejected credential.
    #[error("Invalid API key. Please check your Gemini API key configuration.")]
    Configuration {
        /// Underlying cause.
        detail: String,
    },

    /// The requested model is not served.
    #[error("Model not available. Please try again or check API status.")]
    ModelUnavailable {
        /// Underlying cause.
        detail: String,
    },

    /// The provider quota is exhausted.
    #[error("API quota exceeded. Please try again later.")]
    RateLimit {
        /// Underlying cause.
        detail: String,
    },

    /// Any other failure reaching the completion service.
    #[error("Failed to generate caption and hashtags. Please try again.")]
    Upstream {
        /// Underlying cause.
        detail: String,
    },

    /// The completion did not follow the requested format.
    #[error("Failed to parse AI response")]
    Parse {
        /// Underlying cause.
        detail: String,
    },
}

impl GenerationError {
    /// Returns the underlying cause.
    #[must_use]
    pub fn detail(&self) -> &str {
        match self {
            Self::Configuration { detail }
            | Self::ModelUnavailable { detail }
            | Self::RateLimit { detail }
            | Self::Upstream { detail }
            | Self::Parse { detail } => detail,
        }
    }

    /// Classifies an upstream failure message.
    ///
    /// Matching is on substrings of the provider's wording (`"API key"`,
    /// `"model"`, `"quota"`, in that order) because the transport exposes no
    /// structured error codes. Anything else is [`GenerationError::Upstream`].
    #[must_use]
    pub fn classify(message: impl Into<String>) -> Self {
        let detail = message.into();
        if detail.contains("API key") {
            Self::Configuration { detail }
        } else if detail.contains("model") {
            Self::ModelUnavailable { detail }
        } else if detail.contains("quota") {
            Self::RateLimit { detail }
        } else {
            Self::Upstream { detail }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_substring() {
        assert!(matches!(
            GenerationError::classify("API key not valid. Please pass a valid API key."),
            GenerationError::Configuration { .. }
        ));
        assert!(matches!(
            GenerationError::classify("models/gemini-pro is not found"),
            GenerationError::ModelUnavailable { .. }
        ));
        assert!(matches!(
            GenerationError::classify("Resource has been exhausted (e.g. check quota)."),
            GenerationError::RateLimit { .. }
        ));
        assert!(matches!(
            GenerationError::classify("connection refused"),
            GenerationError::Upstream { .. }
        ));
    }

    #[test]
    fn api_key_wins_over_later_matches() {
        let err = GenerationError::classify("API key lacks access to model, quota unknown");
        assert!(matches!(err, GenerationError::Configuration { .. }));
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert!(matches!(
            GenerationError::classify("Model overloaded"),
            GenerationError::Upstream { .. }
        ));
    }

    #[test]
    fn messages_are_single_lines_and_keep_detail() {
        let err = GenerationError::classify("quota exceeded for project 42");
        assert_eq!(err.to_string(), "API quota exceeded. Please try again later.");
        assert_eq!(err.detail(), "quota exceeded for project 42");
        assert!(!err.to_string().contains('\n'));
    }
}
