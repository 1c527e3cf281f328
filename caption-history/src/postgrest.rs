//! Hosted history table reached through a PostgREST endpoint (e.g. Supabase).

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use caption_adapters::http_client::{HttpsClient, build_https_client, normalize_base_url};
use caption_primitives::GenerationLogEntry;
use hyper::body::to_bytes;
use hyper::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use hyper::{Body, Request, Uri};
use tokio::time::timeout;
use tracing::warn;

use crate::{HistoryError, HistoryResult};
use crate::store::HistoryStore;

/// Table holding one row per completed generation.
pub const GENERATION_LOGS_TABLE: &str = "generation_logs";

/// Connection settings for the hosted table.
#[derive(Clone)]
pub struct PostgrestConfig {
    url: String,
    api_key: String,
    table: String,
    timeout: Duration,
}

impl fmt::Debug for PostgrestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgrestConfig")
            .field("url", &self.url)
            .field("table", &self.table)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl PostgrestConfig {
    /// Creates settings for the project at `url` using the anonymous key.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::Configuration`] when the URL is not an absolute
    /// http(s) URL or the key is blank.
    pub fn new(url: impl AsRef<str>, api_key: impl Into<String>) -> HistoryResult<Self> {
        let url = normalize_base_url(url.as_ref()).ok_or_else(|| {
            HistoryError::Configuration("history store URL must be an absolute http(s) URL".into())
        })?;
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(HistoryError::Configuration(
                "history store key must not be empty".into(),
            ));
        }

        Ok(Self {
            url,
            api_key,
            table: GENERATION_LOGS_TABLE.to_owned(),
            timeout: Duration::from_secs(10),
        })
    }

    /// Overrides the table name.
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn table_endpoint(&self) -> String {
        format!("{}rest/v1/{}", self.url, self.table)
    }
}

/// History store writing rows to a PostgREST table.
pub struct PostgrestHistoryStore {
    client: HttpsClient,
    config: PostgrestConfig,
}

impl fmt::Debug for PostgrestHistoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgrestHistoryStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PostgrestHistoryStore {
    /// Creates a store for the supplied settings.
    #[must_use]
    pub fn new(config: PostgrestConfig) -> Self {
        Self {
            client: build_https_client(),
            config,
        }
    }

    fn insert_uri(&self) -> HistoryResult<Uri> {
        parse_uri(self.config.table_endpoint())
    }

    fn latest_uri(&self, limit: usize) -> HistoryResult<Uri> {
        parse_uri(format!(
            "{}?select=*&order=created_at.desc&limit={limit}",
            self.config.table_endpoint()
        ))
    }

    fn authorized(&self, builder: hyper::http::request::Builder) -> hyper::http::request::Builder {
        builder
            .header("apikey", &self.config.api_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.config.api_key))
    }

    /// Sends `req` and reads the whole body; the timeout covers both.
    async fn send(&self, req: Request<Body>) -> HistoryResult<hyper::body::Bytes> {
        let exchange = async {
            let response = self
                .client
                .request(req)
                .await
                .map_err(|err| HistoryError::Transport(err.to_string()))?;
            let status = response.status();
            let bytes = to_bytes(response.into_body())
                .await
                .map_err(|err| HistoryError::Transport(err.to_string()))?;
            Ok::<_, HistoryError>((status, bytes))
        };

        let (status, bytes) = timeout(self.config.timeout, exchange)
            .await
            .map_err(|_| HistoryError::Transport("history request timed out".into()))??;

        if !status.is_success() {
            return Err(HistoryError::Rejected {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        Ok(bytes)
    }
}

#[async_trait]
impl HistoryStore for PostgrestHistoryStore {
    fn backend(&self) -> &'static str {
        "postgrest"
    }

    async fn append(&self, entry: &GenerationLogEntry) -> HistoryResult<()> {
        let body = serde_json::to_vec(entry)?;
        let req = self
            .authorized(Request::post(self.insert_uri()?))
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", "return=minimal")
            .body(Body::from(body))
            .map_err(|err| HistoryError::Transport(err.to_string()))?;

        self.send(req).await?;
        Ok(())
    }

    async fn latest(&self, limit: usize) -> HistoryResult<Vec<GenerationLogEntry>> {
        let req = self
            .authorized(Request::get(self.latest_uri(limit)?))
            .header(ACCEPT, "application/json")
            .body(Body::empty())
            .map_err(|err| HistoryError::Transport(err.to_string()))?;

        let bytes = self.send(req).await?;
        let rows: Vec<serde_json::Value> = serde_json::from_slice(&bytes)?;

        let mut entries = Vec::with_capacity(rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            match serde_json::from_value::<GenerationLogEntry>(row) {
                Ok(entry) => entries.push(entry),
                Err(err) => warn!(row = index, error = %err, "skipping unreadable history row"),
            }
        }
        Ok(entries)
    }
}

fn parse_uri(raw: String) -> HistoryResult<Uri> {
    raw.parse::<Uri>()
        .map_err(|err| HistoryError::Configuration(format!("invalid history endpoint: {err}")))
}
