//! Prompt, fallback, and parse orchestration for one generation.

use std::fmt;
use std::sync::Arc;

use caption_adapters::CompletionTransport;
use caption_primitives::{GenerationRequest, GenerationResult, ToneOption};
use caption_prompts::CaptionPromptBuilder;
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::{GenerationError, KernelResult};
use crate::parser::parse_completion;
use crate::selector::ModelSelector;

/// Turns a tone and context into a [`GenerationResult`].
#[derive(Clone)]
pub struct GenerationClient {
    transport: Arc<dyn CompletionTransport>,
    selector: ModelSelector,
    prompts: CaptionPromptBuilder,
}

impl fmt::Debug for GenerationClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationClient")
            .field("provider", &self.transport.provider())
            .field("selector", &self.selector)
            .finish_non_exhaustive()
    }
}

impl GenerationClient {
    /// Creates a client using the default model order.
    #[must_use]
    pub fn new(transport: Arc<dyn CompletionTransport>) -> Self {
        Self {
            transport,
            selector: ModelSelector::default(),
            prompts: CaptionPromptBuilder::new(),
        }
    }

    /// Replaces the model fallback order.
    #[must_use]
    pub fn with_selector(mut self, selector: ModelSelector) -> Self {
        self.selector = selector;
        self
    }

    /// Returns the model fallback order.
    #[must_use]
    pub fn selector(&self) -> &ModelSelector {
        &self.selector
    }

    /// Convenience wrapper around [`GenerationClient::generate`].
    ///
    /// # Errors
    ///
    /// See [`GenerationClient::generate`].
    pub async fn generate_request(
        &self,
        request: &GenerationRequest,
    ) -> KernelResult<GenerationResult> {
        self.generate(request.tone(), request.context()).await
    }

    /// Generates a caption and hashtags.
    ///
    /// Candidates are tried in order with the same prompt until one request
    /// succeeds. The completion is parsed once; a malformed completion is not
    /// retried.
    ///
    /// # Errors
    ///
    /// - [`GenerationError::Configuration`] when no credential is configured
    ///   (no request is made).
    /// - The classification of the last failure when every candidate fails.
    /// - [`GenerationError::Parse`] when the completion does not match the
    ///   expected format.
    pub async fn generate(&self, tone: ToneOption, context: &str) -> KernelResult<GenerationResult> {
        if !self.transport.has_credentials() {
            return Err(GenerationError::Configuration {
                detail: format!("{} API key not configured", self.transport.provider()),
            });
        }

        let prompt = self.prompts.build(tone, context);
        let raw = self.complete_with_fallback(&prompt).await?;

        let parsed = parse_completion(&raw).map_err(|err| {
            warn!(error = %err, bytes = raw.len(), "unparseable completion");
            GenerationError::Parse {
                detail: err.to_string(),
            }
        })?;

        GenerationResult::new(parsed.caption, parsed.hashtags, Utc::now()).map_err(|err| {
            GenerationError::Parse {
                detail: err.to_string(),
            }
        })
    }

    async fn complete_with_fallback(&self, prompt: &str) -> KernelResult<String> {
        let mut last_failure = None;

        for model in self.selector.candidates() {
            match self.transport.complete(model, prompt).await {
                Ok(raw) => {
                    info!(provider = self.transport.provider(), model, "completion succeeded");
                    debug!(bytes = raw.len(), "raw completion received");
                    return Ok(raw);
                }
                Err(err) => {
                    warn!(
                        provider = self.transport.provider(),
                        model,
                        error = %err,
                        "completion failed, trying next candidate"
                    );
                    last_failure = Some(err.to_string());
                }
            }
        }

        let detail = last_failure.unwrap_or_else(|| "no candidates were attempted".to_owned());
        Err(GenerationError::classify(detail))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use caption_adapters::{AdapterError, AdapterResult};

    use super::*;

    pub(crate) const GOOD_COMPLETION: &str = "CAPTION: Hello\nHASHTAGS: [a] [b] [c]";

    /// Transport double answering per model; unknown models fail.
    #[derive(Default)]
    pub(crate) struct ScriptedTransport {
        pub(crate) credentials: bool,
        pub(crate) replies: HashMap<String, Result<String, String>>,
        pub(crate) calls: AtomicUsize,
        pub(crate) seen: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedTransport {
        pub(crate) fn new() -> Self {
            Self {
                credentials: true,
                ..Self::default()
            }
        }

        pub(crate) fn reply(mut self, model: &str, reply: Result<&str, &str>) -> Self {
            self.replies.insert(
                model.to_owned(),
                reply.map(str::to_owned).map_err(str::to_owned),
            );
            self
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionTransport for ScriptedTransport {
        fn provider(&self) -> &'static str {
            "scripted"
        }

        fn has_credentials(&self) -> bool {
            self.credentials
        }

        async fn complete(&self, model: &str, prompt: &str) -> AdapterResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen
                .lock()
                .unwrap()
                .push((model.to_owned(), prompt.to_owned()));
            match self.replies.get(model) {
                Some(Ok(text)) => Ok(text.clone()),
                Some(Err(reason)) => Err(AdapterError::transport(reason.clone())),
                None => Err(AdapterError::transport("connection refused")),
            }
        }
    }

    fn client(transport: &Arc<ScriptedTransport>) -> GenerationClient {
        GenerationClient::new(Arc::clone(transport) as Arc<dyn CompletionTransport>)
            .with_selector(ModelSelector::new(["first", "second", "third"]).unwrap())
    }

    #[tokio::test]
    async fn parses_successful_completion() {
        let transport = Arc::new(ScriptedTransport::new().reply("first", Ok(GOOD_COMPLETION)));

        let result = client(&transport)
            .generate(ToneOption::Funny, "")
            .await
            .unwrap();

        assert_eq!(result.caption(), "Hello");
        assert_eq!(result.hashtags(), ["a", "b", "c"]);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn missing_credential_makes_no_call() {
        let transport = Arc::new(ScriptedTransport {
            credentials: false,
            ..ScriptedTransport::default()
        });

        let err = client(&transport)
            .generate(ToneOption::Casual, "ctx")
            .await
            .expect_err("no credential");

        assert!(matches!(err, GenerationError::Configuration { .. }));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn falls_back_with_identical_prompt() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .reply("first", Err("connection reset"))
                .reply("second", Ok(GOOD_COMPLETION)),
        );

        let result = client(&transport)
            .generate(ToneOption::Dramatic, "storm at sea")
            .await
            .unwrap();
        assert_eq!(result.caption(), "Hello");

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, "first");
        assert_eq!(seen[1].0, "second");
        assert_eq!(seen[0].1, seen[1].1);
        assert!(seen[0].1.contains("storm at sea"));
    }

    #[tokio::test]
    async fn exhausting_candidates_is_upstream_error() {
        let transport = Arc::new(ScriptedTransport::new());

        let err = client(&transport)
            .generate(ToneOption::Curious, "")
            .await
            .expect_err("all candidates fail");

        assert!(matches!(err, GenerationError::Upstream { .. }));
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn last_failure_is_classified() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .reply("first", Err("timeout"))
                .reply("second", Err("timeout"))
                .reply("third", Err("Resource has been exhausted (e.g. check quota).")),
        );

        let err = client(&transport)
            .generate(ToneOption::Funny, "")
            .await
            .expect_err("quota");
        assert!(matches!(err, GenerationError::RateLimit { .. }));
    }

    #[tokio::test]
    async fn malformed_completion_is_parse_error_without_retry() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .reply("first", Ok("CAPTION: only a caption"))
                .reply("second", Ok(GOOD_COMPLETION)),
        );

        let err = client(&transport)
            .generate(ToneOption::Sarcastic, "")
            .await
            .expect_err("parse failure");

        assert!(matches!(err, GenerationError::Parse { .. }));
        assert_eq!(err.to_string(), "Failed to parse AI response");
        assert_eq!(transport.calls(), 1);
    }
}
