//! Fixed model handles for automated tests.
//!
//! Covers the four model roles the application exercises in tests, so
//! suites never depend on network access or real credentials. Wired in
//! by `ModelResolver::from_config` when the test-environment flag is
//! set.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Result, bail};
use futures_util::future::BoxFuture;

use super::resolver::ModelSource;
use super::shared::{Completion, CompletionRequest, LanguageModel, ProviderResult, Usage};

/// Canned language model returning a fixed completion.
pub struct MockModel {
    key: String,
    text: String,
    reasoning: Option<String>,
}

impl MockModel {
    pub fn new(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
            reasoning: None,
        }
    }

    /// Canned model whose completions carry a reasoning channel.
    pub fn with_reasoning(
        key: impl Into<String>,
        text: impl Into<String>,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
            reasoning: Some(reasoning.into()),
        }
    }
}

impl LanguageModel for MockModel {
    fn model_id(&self) -> &str {
        &self.key
    }

    fn complete(&self, _request: CompletionRequest) -> BoxFuture<'_, ProviderResult<Completion>> {
        let completion = Completion {
            text: self.text.clone(),
            reasoning: self.reasoning.clone(),
            usage: Usage::default(),
        };
        Box::pin(async move { Ok(completion) })
    }
}

/// Test-double source with pre-registered handles.
///
/// `language_model` returns the registered `Arc` itself, so repeated
/// lookups for the same key yield the same handle.
pub struct MockSource {
    models: HashMap<String, Arc<dyn LanguageModel>>,
}

impl Default for MockSource {
    fn default() -> Self {
        let mut source = Self {
            models: HashMap::new(),
        };
        source.register(MockModel::new("chat-model", "Hello from the chat model."));
        source.register(MockModel::with_reasoning(
            "chat-model-reasoning",
            "Hello from the reasoning model.",
            "Thinking it through.",
        ));
        source.register(MockModel::new("title-model", "A Short Title"));
        source.register(MockModel::new("artifact-model", "Artifact body."));
        source
    }
}

impl MockSource {
    /// Registers (or replaces) a canned model under its key.
    pub fn register(&mut self, model: MockModel) {
        self.models.insert(model.key.clone(), Arc::new(model));
    }
}

impl ModelSource for MockSource {
    fn language_model(&self, backend_id: &str) -> Result<Arc<dyn LanguageModel>> {
        match self.models.get(backend_id) {
            Some(model) => Ok(Arc::clone(model)),
            None => bail!("No mock model registered for '{backend_id}'"),
        }
    }

    fn title_model(&self) -> Result<Arc<dyn LanguageModel>> {
        self.language_model("title-model")
    }

    fn artifact_model(&self) -> Result<Arc<dyn LanguageModel>> {
        self.language_model("artifact-model")
    }
}
