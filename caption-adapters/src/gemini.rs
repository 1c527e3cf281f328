//! Google Gemini transport over the public REST API.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use hyper::body::to_bytes;
use hyper::header::{CONTENT_TYPE, RETRY_AFTER};
use hyper::{Body, Request, StatusCode, Uri};
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{debug, error};

use crate::http_client::{HttpsClient, build_https_client, normalize_base_url};
use crate::traits::{AdapterError, AdapterResult, CompletionTransport};

/// Default endpoint for the Generative Language API.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/";

/// Configuration for the Gemini transport.
#[derive(Clone)]
pub struct GeminiConfig {
    api_key: Option<String>,
    base_url: String,
    timeout: Duration,
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GeminiConfig {
    /// Creates a configuration without a credential.
    #[must_use]
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_GEMINI_BASE_URL.to_owned(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Overrides the base URL used for API calls.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] if the supplied URL is invalid.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> AdapterResult<Self> {
        self.base_url = normalize_base_url(base_url.as_ref()).ok_or_else(|| {
            AdapterError::configuration("Gemini base URL must be an absolute http(s) URL")
        })?;
        Ok(self)
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Supplies an explicit API key. Blank keys count as absent.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.api_key = (!key.trim().is_empty()).then_some(key);
        self
    }

    /// Returns `true` when an API key is present.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Gemini transport issuing one `generateContent` call per completion.
pub struct GeminiTransport {
    client: HttpsClient,
    config: GeminiConfig,
}

impl fmt::Debug for GeminiTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GeminiTransport {
    /// Constructs a transport. A missing key is reported per request, not here.
    #[must_use]
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: build_https_client(),
            config,
        }
    }

    /// Lists the model names visible to the configured key.
    ///
    /// Diagnostic only: every failure is logged and yields an empty list.
    pub async fn list_models(&self) -> Vec<String> {
        match self.fetch_models().await {
            Ok(models) => models,
            Err(err) => {
                error!(error = %err, "error listing Gemini models");
                Vec::new()
            }
        }
    }

    async fn fetch_models(&self) -> AdapterResult<Vec<String>> {
        let uri = self.build_uri("v1beta/models")?;
        let req = Request::get(uri)
            .body(Body::empty())
            .map_err(|err| AdapterError::transport(format!("failed to build Gemini request: {err}")))?;

        let bytes = self.send(req).await?;
        let response: ListModelsResponse = serde_json::from_slice(&bytes)
            .map_err(|err| AdapterError::response(format!("failed to decode Gemini listing: {err}")))?;

        Ok(response.models.into_iter().map(|model| model.name).collect())
    }

    fn api_key(&self) -> AdapterResult<&str> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| AdapterError::configuration("Gemini API key not configured"))
    }

    fn build_uri(&self, path: &str) -> AdapterResult<Uri> {
        let key = self.api_key()?;
        format!("{}{path}?key={key}", self.config.base_url)
            .parse::<Uri>()
            .map_err(|err| AdapterError::configuration(format!("invalid Gemini endpoint: {err}")))
    }

    fn build_request(&self, prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_owned()),
                parts: vec![Part {
                    text: prompt.to_owned(),
                }],
            }],
        }
    }

    /// Sends `req` and reads the whole body; the timeout covers both.
    async fn send(&self, req: Request<Body>) -> AdapterResult<hyper::body::Bytes> {
        let exchange = async {
            let response = self
                .client
                .request(req)
                .await
                .map_err(|err| AdapterError::transport(format!("Gemini request failed: {err}")))?;

            let status = response.status();
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            let bytes = to_bytes(response.into_body()).await.map_err(|err| {
                AdapterError::transport(format!("failed to read Gemini response: {err}"))
            })?;
            Ok::<_, AdapterError>((status, retry_after, bytes))
        };

        let (status, retry_after, bytes) = timeout(self.config.timeout, exchange)
            .await
            .map_err(|_| AdapterError::transport("Gemini request timed out"))??;

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AdapterError::RateLimited {
                retry_after,
                reason: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes);
            return Err(AdapterError::response(format!(
                "Gemini returned {status}: {body}"
            )));
        }

        Ok(bytes)
    }
}

#[async_trait]
impl CompletionTransport for GeminiTransport {
    fn provider(&self) -> &'static str {
        "gemini"
    }

    fn has_credentials(&self) -> bool {
        self.config.has_api_key()
    }

    async fn complete(&self, model: &str, prompt: &str) -> AdapterResult<String> {
        let payload = self.build_request(prompt);
        let body = serde_json::to_vec(&payload).map_err(|err| {
            AdapterError::invalid_request(format!("failed to encode Gemini request: {err}"))
        })?;

        let uri = self.build_uri(&format!("v1beta/models/{model}:generateContent"))?;
        let req = Request::post(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .map_err(|err| {
                AdapterError::transport(format!("failed to build Gemini request: {err}"))
            })?;

        let bytes = self.send(req).await?;
        let response: GenerateContentResponse = serde_json::from_slice(&bytes)
            .map_err(|err| AdapterError::response(format!("failed to decode Gemini response: {err}")))?;

        let parts: Vec<String> = response
            .candidates
            .into_iter()
            .filter_map(|candidate| candidate.content)
            .flat_map(|content| content.parts)
            .map(|part| part.text)
            .collect();

        if parts.is_empty() {
            return Err(AdapterError::response("Gemini returned no candidates"));
        }

        let text = parts.join("\n");
        debug!(model, bytes = text.len(), "received Gemini completion");
        Ok(text)
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
struct ModelInfo {
    name: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn transport_for(server: &MockServer) -> GeminiTransport {
        let config = GeminiConfig::new()
            .with_api_key("test-key")
            .with_base_url(server.uri())
            .expect("mock server URL");
        GeminiTransport::new(config)
    }

    #[test]
    fn base_url_requires_scheme() {
        let err = GeminiConfig::new()
            .with_base_url("generativelanguage.googleapis.com")
            .expect_err("missing scheme should error");

        assert!(matches!(err, AdapterError::Configuration { .. }));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        assert!(!GeminiConfig::new().with_api_key("   ").has_api_key());
        assert!(GeminiConfig::new().with_api_key("k").has_api_key());
    }

    #[test]
    fn debug_output_redacts_key() {
        let cfg = GeminiConfig::new().with_api_key("secret-value");
        assert!(!format!("{cfg:?}").contains("secret-value"));
    }

    #[test]
    fn request_body_wraps_prompt_as_user_content() {
        let transport = GeminiTransport::new(GeminiConfig::new());
        let body = serde_json::to_value(transport.build_request("hello")).unwrap();
        assert_eq!(
            body,
            json!({ "contents": [{ "role": "user", "parts": [{ "text": "hello" }] }] })
        );
    }

    #[tokio::test]
    async fn complete_without_key_is_configuration_error() {
        let transport = GeminiTransport::new(GeminiConfig::new());
        assert!(!transport.has_credentials());

        let err = transport
            .complete("gemini-1.5-flash", "prompt")
            .await
            .expect_err("no key");
        assert!(err.to_string().contains("API key"));
    }

    #[tokio::test]
    async fn complete_joins_candidate_parts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
            .and(query_param("key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{ "parts": [{ "text": "write a caption" }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {
                        "role": "model",
                        "parts": [{ "text": "CAPTION: Hi" }, { "text": "HASHTAGS: [a]" }]
                    }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = transport_for(&server)
            .complete("gemini-1.5-flash", "write a caption")
            .await
            .unwrap();
        assert_eq!(text, "CAPTION: Hi\nHASHTAGS: [a]");
    }

    #[tokio::test]
    async fn error_status_keeps_provider_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_string("models/gemini-pro is not found for API version v1beta"),
            )
            .mount(&server)
            .await;

        let err = transport_for(&server)
            .complete("gemini-pro", "p")
            .await
            .expect_err("404");
        assert!(matches!(err, AdapterError::Response { .. }));
        assert!(err.to_string().contains("is not found"));
    }

    #[tokio::test]
    async fn too_many_requests_is_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(429)
                    .insert_header("retry-after", "12")
                    .set_body_string("Resource has been exhausted (e.g. check quota)."),
            )
            .mount(&server)
            .await;

        let err = transport_for(&server)
            .complete("gemini-1.5-flash", "p")
            .await
            .expect_err("429");
        match err {
            AdapterError::RateLimited {
                retry_after,
                reason,
            } => {
                assert_eq!(retry_after, Some(Duration::from_secs(12)));
                assert!(reason.contains("quota"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn empty_candidates_is_response_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let err = transport_for(&server)
            .complete("gemini-1.5-flash", "p")
            .await
            .expect_err("no candidates");
        assert!(matches!(err, AdapterError::Response { .. }));
    }

    #[tokio::test]
    async fn list_models_returns_names_or_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1beta/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "models": [{ "name": "models/gemini-1.5-flash" }, { "name": "models/gemini-pro" }]
            })))
            .mount(&server)
            .await;

        let models = transport_for(&server).list_models().await;
        assert_eq!(models, ["models/gemini-1.5-flash", "models/gemini-pro"]);

        let unconfigured = GeminiTransport::new(GeminiConfig::new());
        assert!(unconfigured.list_models().await.is_empty());
    }

    /// Accepts one connection, sends headers and part of the body, then stalls.
    fn stalled_server() -> String {
        use std::io::{Read, Write};
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut socket, _)) = listener.accept() {
                let mut buf = [0_u8; 4096];
                let _ = socket.read(&mut buf);
                let _ = socket.write_all(
                    b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 100\r\n\r\n{\"cand",
                );
                let _ = socket.flush();
                std::thread::sleep(Duration::from_secs(5));
            }
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn timeout_covers_a_stalled_body() {
        let config = GeminiConfig::new()
            .with_api_key("test-key")
            .with_base_url(stalled_server())
            .unwrap()
            .with_timeout(Duration::from_millis(200));
        let transport = GeminiTransport::new(config);

        let outcome = tokio::time::timeout(
            Duration::from_secs(3),
            transport.complete("gemini-1.5-flash", "p"),
        )
        .await
        .expect("configured timeout should fire first");

        let err = outcome.expect_err("stalled body");
        assert!(matches!(err, AdapterError::Transport { .. }));
        assert!(err.to_string().contains("timed out"));
    }
}
