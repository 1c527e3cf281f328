//! Process configuration.
//!
//! Settings come from environment variables, read once at start-up. Blank
//! values are treated as unset. Missing history settings disable history
//! without error; a missing completion key is only reported when a
//! generation is attempted.

#![warn(missing_docs, clippy::pedantic)]

use std::env;
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use tracing::warn;

/// Completion service credential.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Optional completion service endpoint override.
pub const GEMINI_BASE_URL_ENV: &str = "GEMINI_BASE_URL";
/// Optional comma-separated model fallback order.
pub const MODELS_ENV: &str = "CAPTION_MODELS";
/// Hosted history project URL.
pub const SUPABASE_URL_ENV: &str = "SUPABASE_URL";
/// Hosted history anonymous key.
pub const SUPABASE_ANON_KEY_ENV: &str = "SUPABASE_ANON_KEY";
/// Local history journal path, used when no hosted store is configured.
pub const HISTORY_PATH_ENV: &str = "CAPTION_HISTORY_PATH";

/// Invalid configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The model override lists no usable identifiers.
    #[error("{MODELS_ENV} must list at least one model identifier")]
    EmptyModelList,
}

/// Where generation history is written.
#[derive(Clone, PartialEq, Eq)]
pub enum HistorySettings {
    /// History is not recorded.
    Disabled,
    /// Hosted PostgREST table.
    Hosted {
        /// Project base URL.
        url: String,
        /// Anonymous API key.
        api_key: String,
    },
    /// Local newline-delimited JSON journal.
    File(PathBuf),
}

impl fmt::Debug for HistorySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => f.write_str("Disabled"),
            Self::Hosted { url, .. } => f
                .debug_struct("Hosted")
                .field("url", url)
                .finish_non_exhaustive(),
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

/// Settings for one process.
#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    gemini_api_key: Option<String>,
    gemini_base_url: Option<String>,
    models: Option<Vec<String>>,
    history: HistorySettings,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<redacted>"))
            .field("gemini_base_url", &self.gemini_base_url)
            .field("models", &self.models)
            .field("history", &self.history)
            .finish()
    }
}

impl AppConfig {
    /// Reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads settings through `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyModelList`] when the model override is set
    /// but contains no identifiers.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let models = match get(MODELS_ENV) {
            Some(raw) => Some(parse_model_list(&raw)?),
            None => None,
        };

        let history = match (get(SUPABASE_URL_ENV), get(SUPABASE_ANON_KEY_ENV)) {
            (Some(url), Some(api_key)) => HistorySettings::Hosted { url, api_key },
            (url, key) => {
                if url.is_some() || key.is_some() {
                    warn!(
                        "only one of {SUPABASE_URL_ENV} and {SUPABASE_ANON_KEY_ENV} is set; hosted history disabled"
                    );
                }
                get(HISTORY_PATH_ENV).map_or(HistorySettings::Disabled, |path| {
                    HistorySettings::File(PathBuf::from(path))
                })
            }
        };

        Ok(Self {
            gemini_api_key: get(GEMINI_API_KEY_ENV),
            gemini_base_url: get(GEMINI_BASE_URL_ENV),
            models,
            history,
        })
    }

    /// Returns the completion service key, if configured.
    #[must_use]
    pub fn gemini_api_key(&self) -> Option<&str> {
        self.gemini_api_key.as_deref()
    }

    /// Returns the completion endpoint override, if configured.
    #[must_use]
    pub fn gemini_base_url(&self) -> Option<&str> {
        self.gemini_base_url.as_deref()
    }

    /// Returns the model order override, if configured.
    #[must_use]
    pub fn models(&self) -> Option<&[String]> {
        self.models.as_deref()
    }

    /// Returns the history destination.
    #[must_use]
    pub fn history(&self) -> &HistorySettings {
        &self.history
    }
}

fn parse_model_list(raw: &str) -> Result<Vec<String>, ConfigError> {
    let models: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|model| !model.is_empty())
        .map(str::to_owned)
        .collect();
    if models.is_empty() {
        return Err(ConfigError::EmptyModelList);
    }
    Ok(models)
}
