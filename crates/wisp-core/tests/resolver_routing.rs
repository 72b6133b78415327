//! Resolver routing tests against trait doubles.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use futures_util::future::BoxFuture;
use wisp_core::providers::mock::MockSource;
use wisp_core::providers::resolver::{FLAGSHIP_MODEL, ModelResolver, ModelSource};
use wisp_core::providers::shared::{
    ChatMessage, Completion, CompletionRequest, LanguageModel, ProviderResult, Usage,
};

/// Source that records every backend id it is asked for and hands out
/// models echoing a fixed raw reply.
struct RecordingSource {
    requested: Mutex<Vec<String>>,
    reply: String,
}

impl RecordingSource {
    fn new(reply: impl Into<String>) -> Self {
        Self {
            requested: Mutex::new(Vec::new()),
            reply: reply.into(),
        }
    }

    fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl ModelSource for RecordingSource {
    fn language_model(&self, backend_id: &str) -> Result<Arc<dyn LanguageModel>> {
        self.requested.lock().unwrap().push(backend_id.to_string());
        Ok(Arc::new(EchoModel {
            id: backend_id.to_string(),
            reply: self.reply.clone(),
        }))
    }
}

/// Model whose completions always contain the configured raw reply.
struct EchoModel {
    id: String,
    reply: String,
}

impl LanguageModel for EchoModel {
    fn model_id(&self) -> &str {
        &self.id
    }

    fn complete(&self, _request: CompletionRequest) -> BoxFuture<'_, ProviderResult<Completion>> {
        let completion = Completion {
            text: self.reply.clone(),
            reasoning: None,
            usage: Usage::default(),
        };
        Box::pin(async move { Ok(completion) })
    }
}

fn prompt() -> CompletionRequest {
    CompletionRequest {
        system: None,
        messages: vec![ChatMessage::user("hello")],
        max_tokens: Some(64),
    }
}

#[tokio::test]
async fn test_reasoning_request_strips_suffix_and_wraps() {
    let source = Arc::new(RecordingSource::new(
        "<thinking>plan the answer</thinking>\nFinal answer.",
    ));
    let resolver = ModelResolver::new(Arc::clone(&source) as Arc<dyn ModelSource>);

    let model = resolver
        .language_model("anthropic/claude-3.7-sonnet-thinking")
        .unwrap();

    // The source sees the clean backend id, suffix and prefix gone.
    assert_eq!(source.requested(), vec!["claude-3.7-sonnet"]);
    assert_eq!(model.model_id(), "claude-3.7-sonnet");

    // The wrapper separates the channels of the raw reply.
    let completion = model.complete(prompt()).await.unwrap();
    assert_eq!(completion.reasoning.as_deref(), Some("plan the answer"));
    assert_eq!(completion.text, "Final answer.");
}

#[tokio::test]
async fn test_plain_request_passes_through_unwrapped() {
    let source = Arc::new(RecordingSource::new("<thinking>left alone</thinking> hi"));
    let resolver = ModelResolver::new(Arc::clone(&source) as Arc<dyn ModelSource>);

    let model = resolver
        .language_model("anthropic/claude-sonnet-4-5")
        .unwrap();

    assert_eq!(source.requested(), vec!["claude-sonnet-4-5"]);

    // No extraction on the non-reasoning path: tags stay in the text.
    let completion = model.complete(prompt()).await.unwrap();
    assert_eq!(completion.reasoning, None);
    assert_eq!(completion.text, "<thinking>left alone</thinking> hi");
}

#[test]
fn test_unprefixed_request_reaches_source_unchanged() {
    let source = Arc::new(RecordingSource::new("ok"));
    let resolver = ModelResolver::new(Arc::clone(&source) as Arc<dyn ModelSource>);

    resolver.language_model("claude-haiku-4-5").unwrap();
    assert_eq!(source.requested(), vec!["claude-haiku-4-5"]);
}

#[test]
fn test_title_and_artifact_request_the_flagship_backend() {
    let source = Arc::new(RecordingSource::new("ok"));
    let resolver = ModelResolver::new(Arc::clone(&source) as Arc<dyn ModelSource>);

    let title = resolver.title_model().unwrap();
    let artifact = resolver.artifact_model().unwrap();

    assert_eq!(source.requested(), vec![FLAGSHIP_MODEL, FLAGSHIP_MODEL]);
    assert_eq!(title.model_id(), FLAGSHIP_MODEL);
    assert_eq!(artifact.model_id(), FLAGSHIP_MODEL);
}

#[test]
fn test_mock_source_returns_registered_chat_handle() {
    let source = Arc::new(MockSource::default());
    let resolver = ModelResolver::new(Arc::clone(&source) as Arc<dyn ModelSource>);

    let resolved = resolver.language_model("chat-model").unwrap();
    let registered = source.language_model("chat-model").unwrap();

    // Same allocation, not an equivalent copy.
    assert!(Arc::ptr_eq(&resolved, &registered));
}

#[tokio::test]
async fn test_mock_reasoning_channel_survives_wrapping() {
    let resolver = ModelResolver::new(Arc::new(MockSource::default()));

    let model = resolver.language_model("chat-model-reasoning").unwrap();
    let completion = model.complete(prompt()).await.unwrap();

    // The canned completion already separates its channels; the
    // extraction wrapper must not disturb it.
    assert_eq!(completion.text, "Hello from the reasoning model.");
    assert_eq!(completion.reasoning.as_deref(), Some("Thinking it through."));
}

#[test]
fn test_mock_source_rejects_unknown_ids() {
    let resolver = ModelResolver::new(Arc::new(MockSource::default()));

    let err = resolver.language_model("anthropic/claude-2").err().unwrap();
    assert!(err.to_string().contains("claude-2"));
}

#[test]
fn test_mock_title_and_artifact_handles_are_distinct() {
    let resolver = ModelResolver::new(Arc::new(MockSource::default()));

    let title = resolver.title_model().unwrap();
    let artifact = resolver.artifact_model().unwrap();

    assert_eq!(title.model_id(), "title-model");
    assert_eq!(artifact.model_id(), "artifact-model");
    assert!(!Arc::ptr_eq(&title, &artifact));
}
