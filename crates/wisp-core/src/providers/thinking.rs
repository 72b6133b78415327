//! Parser and middleware for thinking/reasoning tag extraction.
//!
//! Reasoning-capable models demarcate intermediate thinking with
//! `<tag>...</tag>` markers in their raw output and may run the final
//! answer directly after the closing tag. This module splits the two
//! channels at the closing-tag boundary.
//!
//! Example raw output:
//! ```text
//! <thinking>
//! Let me analyze this...
//! </thinking>
//! Here is my response.
//! ```

use std::sync::Arc;

use futures_util::future::BoxFuture;

use super::shared::{Completion, CompletionRequest, LanguageModel, ProviderResult};

/// Result of splitting raw output at a reasoning tag boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThinkingParseResult {
    /// The reasoning portion (before the closing tag)
    pub reasoning: String,
    /// Content that followed the closing tag, if any
    pub content: Option<String>,
    /// Whether the closing tag was found (reasoning is complete)
    pub thinking_complete: bool,
}

/// Splits reasoning-channel content at the closing `</tag>` marker.
///
/// If the closing tag is present, everything before it is `reasoning`,
/// everything after it (leading whitespace trimmed) is `content`, and
/// `thinking_complete` is true. Without a closing tag the whole input
/// is reasoning-in-progress.
pub fn parse_thinking(content: &str, tag: &str) -> ThinkingParseResult {
    let close = format!("</{tag}>");
    if let Some(end) = content.find(close.as_str()) {
        let reasoning_text = &content[..end];
        let after = content[end + close.len()..].trim_start();

        ThinkingParseResult {
            reasoning: reasoning_text.to_string(),
            content: if after.is_empty() {
                None
            } else {
                Some(after.to_string())
            },
            thinking_complete: true,
        }
    } else {
        ThinkingParseResult {
            reasoning: content.to_string(),
            content: None,
            thinking_complete: false,
        }
    }
}

/// Strips an opening `<tag>` marker if present at the start.
///
/// Leading whitespace before the marker is allowed; markers appearing
/// mid-content are preserved.
pub fn strip_tag_start<'a>(content: &'a str, tag: &str) -> &'a str {
    let open = format!("<{tag}>");
    let trimmed = content.trim_start();
    if let Some(rest) = trimmed.strip_prefix(open.as_str()) {
        rest.trim_start_matches('\n')
    } else {
        content
    }
}

/// Splits a complete raw output into `(reasoning, text)` channels.
///
/// Output without an opening marker is all answer text. A truncated
/// output (opening marker, no closing marker) yields reasoning only.
fn split_tagged_output(raw: &str, tag: &str) -> (Option<String>, String) {
    let open = format!("<{tag}>");
    let Some(start) = raw.find(open.as_str()) else {
        return (None, raw.to_string());
    };

    let before = &raw[..start];
    let parsed = parse_thinking(&raw[start + open.len()..], tag);

    let reasoning = parsed.reasoning.trim();
    let reasoning = (!reasoning.is_empty()).then(|| reasoning.to_string());

    let mut text = before.to_string();
    if let Some(content) = parsed.content {
        text.push_str(&content);
    }

    (reasoning, text)
}

/// Middleware handle that separates tag-demarcated thinking from the
/// final answer of a wrapped model.
///
/// Forwards `model_id` to the inner handle. Completions that already
/// carry a reasoning channel pass through untouched.
pub struct ExtractReasoning {
    inner: Arc<dyn LanguageModel>,
    tag: String,
}

impl ExtractReasoning {
    pub fn new(inner: Arc<dyn LanguageModel>, tag: impl Into<String>) -> Self {
        Self {
            inner,
            tag: tag.into(),
        }
    }

    /// Tag name demarcating reasoning content.
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl LanguageModel for ExtractReasoning {
    fn model_id(&self) -> &str {
        self.inner.model_id()
    }

    fn complete(&self, request: CompletionRequest) -> BoxFuture<'_, ProviderResult<Completion>> {
        Box::pin(async move {
            let completion = self.inner.complete(request).await?;
            if completion.reasoning.is_some() {
                return Ok(completion);
            }

            let (reasoning, text) = split_tagged_output(&completion.text, &self.tag);
            Ok(Completion {
                text,
                reasoning,
                usage: completion.usage,
            })
        })
    }
}
