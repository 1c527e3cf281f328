use std::path::PathBuf;
use std::sync::Arc;

use caption_alchemist::adapters::{GeminiConfig, GeminiTransport};
use caption_alchemist::history::{FileHistoryStore, HistoryLog};
use caption_alchemist::kernel::{
    GenerationClient, GenerationError, GenerationSession, ModelSelector, SessionError,
};
use caption_alchemist::primitives::{ToneOption, VideoSelection};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_FLASH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";
const GENERATE_PRO: &str = "/v1beta/models/gemini-1.5-pro:generateContent";

fn completion(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
    }))
}

fn journal_path() -> PathBuf {
    std::env::temp_dir().join(format!("caption-flow-{}.jsonl", Uuid::new_v4()))
}

async fn session(server: &MockServer, history: HistoryLog) -> GenerationSession {
    let config = GeminiConfig::new()
        .with_api_key("integration-key")
        .with_base_url(server.uri())
        .unwrap();
    let client = GenerationClient::new(Arc::new(GeminiTransport::new(config))).with_selector(
        ModelSelector::new(["gemini-1.5-flash", "gemini-1.5-pro"]).unwrap(),
    );
    let session = GenerationSession::new(client, history);
    session.select_video(VideoSelection::new("skate.mp4").unwrap());
    session
}

#[tokio::test]
async fn falls_back_to_second_model_and_records_history() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_FLASH))
        .respond_with(ResponseTemplate::new(503).set_body_string("backend unavailable"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PRO))
        .respond_with(completion(
            "CAPTION: Gravity called, I declined 🛹\nHASHTAGS: [#skate] [#fyp] [#kickflip]",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let journal = journal_path();
    let store = Arc::new(FileHistoryStore::open(&journal).await.unwrap());
    let history = HistoryLog::new(store);
    let session = session(&server, history.clone()).await;

    let result = session
        .generate(ToneOption::Funny, "first kickflip at the park")
        .await
        .unwrap();
    session.flush_history().await;

    assert_eq!(result.caption(), "Gravity called, I declined 🛹");
    assert_eq!(result.hashtags(), ["#skate", "#fyp", "#kickflip"]);

    let logged = history.list_recent().await;
    assert_eq!(logged.len(), 1);
    assert_eq!(logged[0].video_name(), "skate.mp4");
    assert_eq!(logged[0].context(), "first kickflip at the park");
    assert_eq!(logged[0].caption(), result.caption());

    let _ = std::fs::remove_file(journal);
}

#[tokio::test]
async fn missing_models_surface_as_model_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_string("models/gemini-1.5-pro is not found for API version v1beta"),
        )
        .expect(2)
        .mount(&server)
        .await;

    let session = session(&server, HistoryLog::disabled()).await;
    let err = session
        .generate(ToneOption::Casual, "")
        .await
        .expect_err("every model missing");

    assert!(matches!(
        err,
        SessionError::Generation(GenerationError::ModelUnavailable { .. })
    ));
    assert_eq!(
        err.to_string(),
        "Model not available. Please try again or check API status."
    );
    assert!(session.results().is_empty());
}

#[tokio::test]
async fn unstructured_reply_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_FLASH))
        .respond_with(completion("Here is a great caption for your video!"))
        .expect(1)
        .mount(&server)
        .await;

    let session = session(&server, HistoryLog::disabled()).await;
    let err = session
        .generate(ToneOption::Inspirational, "")
        .await
        .expect_err("no markers");

    assert_eq!(err.to_string(), "Failed to parse AI response");
    assert!(!session.is_generating());
}
