//! Wiring from process configuration to runtime collaborators.

use std::sync::Arc;

use anyhow::{Context, Result};
use caption_alchemist::adapters::{GeminiConfig, GeminiTransport};
use caption_alchemist::config::{AppConfig, HistorySettings};
use caption_alchemist::history::{
    FileHistoryStore, HistoryLog, HistoryStore, PostgrestConfig, PostgrestHistoryStore,
};
use caption_alchemist::kernel::{GenerationClient, GenerationSession, ModelSelector};
use tracing::{info, warn};

/// Builds the Gemini transport; a missing key is reported at generation time.
pub fn transport(config: &AppConfig) -> Result<GeminiTransport> {
    let mut gemini = GeminiConfig::new();
    if let Some(key) = config.gemini_api_key() {
        gemini = gemini.with_api_key(key);
    }
    if let Some(url) = config.gemini_base_url() {
        gemini = gemini
            .with_base_url(url)
            .context("invalid GEMINI_BASE_URL")?;
    }
    Ok(GeminiTransport::new(gemini))
}

/// Builds the history log. Store set-up failures disable history.
pub async fn history(config: &AppConfig) -> HistoryLog {
    let store: Arc<dyn HistoryStore> = match config.history() {
        HistorySettings::Disabled => return HistoryLog::disabled(),
        HistorySettings::Hosted { url, api_key } => match PostgrestConfig::new(url, api_key.clone()) {
            Ok(settings) => Arc::new(PostgrestHistoryStore::new(settings)),
            Err(err) => {
                warn!(error = %err, "hosted history disabled");
                return HistoryLog::disabled();
            }
        },
        HistorySettings::File(path) => match FileHistoryStore::open(path.clone()).await {
            Ok(store) => Arc::new(store),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "file history disabled");
                return HistoryLog::disabled();
            }
        },
    };
    info!(backend = store.backend(), "history enabled");
    HistoryLog::new(store)
}

/// Builds a generation session from configuration.
pub async fn session(config: &AppConfig) -> Result<GenerationSession> {
    let mut client = GenerationClient::new(Arc::new(transport(config)?));
    if let Some(models) = config.models() {
        client = client.with_selector(ModelSelector::new(models).context("invalid CAPTION_MODELS")?);
    }
    Ok(GenerationSession::new(client, history(config).await))
}
