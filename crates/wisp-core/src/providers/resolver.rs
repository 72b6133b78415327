//! Model resolution: requested id to callable handle.
//!
//! The resolver owns no provider logic itself; it normalizes the
//! requested id, asks the injected [`ModelSource`] for a handle, and
//! wraps reasoning requests with thinking-tag extraction. Sources are
//! interchangeable: the real Anthropic adapter in production, the
//! canned test double under the test-environment flag.

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use super::anthropic::{AnthropicConfig, AnthropicSource};
use super::mock::MockSource;
use super::shared::LanguageModel;
use super::thinking::ExtractReasoning;
use super::{is_reasoning_request, resolve_backend_id};
use crate::config::{Config, is_test_environment};

/// Backend id used for title and artifact generation.
pub const FLAGSHIP_MODEL: &str = "claude-opus-4-5";

/// Tag name demarcating reasoning content in raw model output.
pub const REASONING_TAG: &str = "thinking";

/// Capability that resolves a backend model id to a callable handle.
pub trait ModelSource: Send + Sync {
    /// Resolves a backend model id to a handle.
    ///
    /// # Errors
    /// Implementation-defined; failures propagate to the caller
    /// unmodified.
    fn language_model(&self, backend_id: &str) -> Result<Arc<dyn LanguageModel>>;

    /// Handle used for thread-title generation.
    fn title_model(&self) -> Result<Arc<dyn LanguageModel>> {
        self.language_model(FLAGSHIP_MODEL)
    }

    /// Handle used for artifact generation.
    ///
    /// Same backend as [`ModelSource::title_model`] today; kept as a
    /// separate entry point so the two can diverge.
    fn artifact_model(&self) -> Result<Arc<dyn LanguageModel>> {
        self.language_model(FLAGSHIP_MODEL)
    }
}

/// Stateless resolver over an injected model source.
pub struct ModelResolver {
    source: Arc<dyn ModelSource>,
}

impl ModelResolver {
    pub fn new(source: Arc<dyn ModelSource>) -> Self {
        Self { source }
    }

    /// Builds a resolver wired for the current environment.
    ///
    /// Under `WISP_TEST_MODE` this installs the canned [`MockSource`];
    /// otherwise the Anthropic source, with credentials resolved from
    /// config and environment.
    ///
    /// # Errors
    /// Returns an error if provider credentials cannot be resolved.
    pub fn from_config(config: &Config) -> Result<Self> {
        if is_test_environment() {
            return Ok(Self::new(Arc::new(MockSource::default())));
        }

        let provider = &config.providers.anthropic;
        let anthropic =
            AnthropicConfig::from_env(provider.base_url.as_deref(), provider.api_key.as_deref())?;
        Ok(Self::new(Arc::new(AnthropicSource::new(anthropic))))
    }

    /// Resolves a requested model id to a callable handle.
    ///
    /// The vendor prefix is stripped for the source; reasoning requests
    /// additionally lose a trailing `-thinking` suffix and come back
    /// wrapped with [`ExtractReasoning`] on the `"thinking"` tag.
    ///
    /// No validation against the registry happens here: unknown ids go
    /// straight to the source and its errors propagate unmodified.
    ///
    /// # Errors
    /// Whatever the underlying source returns.
    pub fn language_model(&self, requested: &str) -> Result<Arc<dyn LanguageModel>> {
        let backend = resolve_backend_id(requested);

        if is_reasoning_request(requested) {
            let clean = backend.strip_suffix("-thinking").unwrap_or(backend);
            debug!(requested, backend = clean, "resolving reasoning model");
            let base = self.source.language_model(clean)?;
            return Ok(Arc::new(ExtractReasoning::new(base, REASONING_TAG)));
        }

        self.source.language_model(backend)
    }

    /// Handle for thread-title generation (never reasoning-wrapped).
    ///
    /// # Errors
    /// Whatever the underlying source returns.
    pub fn title_model(&self) -> Result<Arc<dyn LanguageModel>> {
        self.source.title_model()
    }

    /// Handle for artifact generation (never reasoning-wrapped).
    ///
    /// # Errors
    /// Whatever the underlying source returns.
    pub fn artifact_model(&self) -> Result<Arc<dyn LanguageModel>> {
        self.source.artifact_model()
    }
}
