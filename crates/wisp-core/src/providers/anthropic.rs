//! Anthropic Messages API model source (API key auth).

use std::sync::Arc;

use anyhow::Result;
use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::resolver::ModelSource;
use super::shared::{
    ChatMessage, Completion, CompletionRequest, LanguageModel, ProviderError, ProviderErrorKind,
    ProviderResult, USER_AGENT, Usage, resolve_api_key, resolve_base_url,
};

/// Default base URL for the Anthropic API.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

const API_VERSION: &str = "2023-06-01";

/// Response token cap applied when the request does not set one.
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Configuration for the Anthropic source.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// The authentication token (API key)
    pub api_key: String,
    pub base_url: String,
}

impl AnthropicConfig {
    /// Creates a new config from file values plus environment.
    ///
    /// Authentication resolution order:
    /// 1. `config_api_key` parameter (from config file)
    /// 2. `ANTHROPIC_API_KEY` environment variable
    ///
    /// Base URL resolution order:
    /// 1. `ANTHROPIC_BASE_URL` env var (if set and non-empty)
    /// 2. `config_base_url` parameter (if Some and non-empty)
    /// 3. Default: `https://api.anthropic.com`
    pub fn from_env(config_base_url: Option<&str>, config_api_key: Option<&str>) -> Result<Self> {
        let api_key = resolve_api_key(config_api_key, "ANTHROPIC_API_KEY", "anthropic")?;
        let base_url = resolve_base_url(
            config_base_url,
            "ANTHROPIC_BASE_URL",
            DEFAULT_BASE_URL,
            "Anthropic",
        )?;

        Ok(Self { api_key, base_url })
    }
}

/// Model source backed by the Anthropic Messages API.
///
/// Constructing a handle performs no network I/O and no id validation;
/// an unknown model id fails inside the API call and that failure
/// propagates to the caller.
pub struct AnthropicSource {
    config: AnthropicConfig,
    http: reqwest::Client,
}

impl AnthropicSource {
    /// Creates a new Anthropic source with the given configuration.
    ///
    /// # Panics
    /// - In test builds (`#[cfg(test)]`), panics if `base_url` is the production API.
    /// - At runtime, panics if `WISP_BLOCK_REAL_API=1` and `base_url` is the production API.
    ///
    /// This prevents tests from accidentally making real network requests.
    /// Use `ANTHROPIC_BASE_URL` env var or config to point to a mock server.
    pub fn new(config: AnthropicConfig) -> Self {
        // Compile-time guard for unit tests
        #[cfg(test)]
        assert!(
            config.base_url != DEFAULT_BASE_URL,
            "Tests must not use the production Anthropic API!\n\
             Set ANTHROPIC_BASE_URL to a mock server (e.g., wiremock).\n\
             Found base_url: {}",
            config.base_url
        );

        // Runtime guard for integration tests (set WISP_BLOCK_REAL_API=1 in test harness)
        #[cfg(not(test))]
        if std::env::var("WISP_BLOCK_REAL_API").is_ok_and(|v| v == "1")
            && config.base_url == DEFAULT_BASE_URL
        {
            panic!(
                "WISP_BLOCK_REAL_API=1 but trying to use production Anthropic API!\n\
                 Set ANTHROPIC_BASE_URL to a mock server.\n\
                 Found base_url: {}",
                config.base_url
            );
        }

        Self {
            config,
            http: reqwest::Client::new(),
        }
    }
}

impl ModelSource for AnthropicSource {
    fn language_model(&self, backend_id: &str) -> Result<Arc<dyn LanguageModel>> {
        debug!(model = backend_id, "constructing anthropic model handle");
        Ok(Arc::new(AnthropicModel {
            model: backend_id.to_string(),
            config: self.config.clone(),
            http: self.http.clone(),
        }))
    }
}

/// A ready-to-invoke handle for one Anthropic model.
pub struct AnthropicModel {
    model: String,
    config: AnthropicConfig,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseBlock>,
    #[serde(default)]
    usage: ApiUsage,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ResponseBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "thinking")]
    Thinking { thinking: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Default, Deserialize)]
struct ApiUsage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

impl LanguageModel for AnthropicModel {
    fn model_id(&self) -> &str {
        &self.model
    }

    fn complete(&self, request: CompletionRequest) -> BoxFuture<'_, ProviderResult<Completion>> {
        Box::pin(async move {
            let body = MessagesRequest {
                model: &self.model,
                max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
                system: request.system.as_deref(),
                messages: &request.messages,
            };
            let url = format!("{}/v1/messages", self.config.base_url);

            let response = self
                .http
                .post(&url)
                .header("x-api-key", &self.config.api_key)
                .header("anthropic-version", API_VERSION)
                .header(reqwest::header::USER_AGENT, USER_AGENT)
                .json(&body)
                .send()
                .await
                .map_err(|e| {
                    if e.is_timeout() {
                        ProviderError::timeout(e.to_string())
                    } else {
                        ProviderError::new(ProviderErrorKind::ApiError, e.to_string())
                    }
                })?;

            let status = response.status();
            let body_text = response
                .text()
                .await
                .map_err(|e| ProviderError::parse(e.to_string()))?;

            if !status.is_success() {
                return Err(ProviderError::http_status(status.as_u16(), &body_text));
            }

            let parsed: MessagesResponse = serde_json::from_str(&body_text)
                .map_err(|e| ProviderError::parse(format!("Invalid messages response: {e}")))?;

            let mut text = String::new();
            let mut reasoning = String::new();
            for block in parsed.content {
                match block {
                    ResponseBlock::Text { text: chunk } => text.push_str(&chunk),
                    ResponseBlock::Thinking { thinking } => reasoning.push_str(&thinking),
                    ResponseBlock::Other => {}
                }
            }

            Ok(Completion {
                text,
                reasoning: (!reasoning.is_empty()).then_some(reasoning),
                usage: Usage {
                    input_tokens: parsed.usage.input_tokens,
                    output_tokens: parsed.usage.output_tokens,
                },
            })
        })
    }
}
