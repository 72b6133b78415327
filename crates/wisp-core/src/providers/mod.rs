//! Model sources and model-id resolution.

pub mod anthropic;
pub mod mock;
pub mod resolver;
pub mod shared;
pub mod thinking;

pub use resolver::{FLAGSHIP_MODEL, ModelResolver, ModelSource, REASONING_TAG};
pub use shared::{
    ChatMessage, Completion, CompletionRequest, LanguageModel, ProviderError, ProviderErrorKind,
    ProviderResult, Usage, resolve_api_key, resolve_base_url,
};

/// Strips a single leading `vendor/` segment from a requested model id.
///
/// Splits on the FIRST `/` and keeps everything after it, so backend
/// ids that themselves contain `/` survive intact (`"a/b/c"` becomes
/// `"b/c"`). Ids without a separator pass through unchanged.
pub fn resolve_backend_id(requested: &str) -> &str {
    match requested.split_once('/') {
        Some((_, rest)) => rest,
        None => requested,
    }
}

/// Returns true when a requested id names a reasoning-capable variant.
///
/// Raw string check: contains `"reasoning"` anywhere, or ends with
/// `"-thinking"`. Deliberately independent of the registry so callers
/// can probe ids that are not listed there.
pub fn is_reasoning_request(requested: &str) -> bool {
    requested.contains("reasoning") || requested.ends_with("-thinking")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_backend_id_strips_vendor_prefix() {
        assert_eq!(
            resolve_backend_id("anthropic/claude-opus-4-5"),
            "claude-opus-4-5"
        );
    }

    #[test]
    fn test_resolve_backend_id_without_separator_is_identity() {
        assert_eq!(resolve_backend_id("claude-opus-4-5"), "claude-opus-4-5");
    }

    #[test]
    fn test_resolve_backend_id_strips_only_first_segment() {
        // Some backend ids carry their own slashes; only the vendor tag
        // comes off.
        assert_eq!(resolve_backend_id("a/b/c"), "b/c");
    }

    #[test]
    fn test_reasoning_request_by_thinking_suffix() {
        assert!(is_reasoning_request("anthropic/claude-3.7-sonnet-thinking"));
    }

    #[test]
    fn test_reasoning_request_by_substring() {
        assert!(is_reasoning_request("chat-model-reasoning"));
        assert!(is_reasoning_request("reasoning-preview"));
    }

    #[test]
    fn test_plain_id_is_not_a_reasoning_request() {
        assert!(!is_reasoning_request("anthropic/claude-opus-4-5"));
        // "thinking" mid-id does not count; only the suffix form does.
        assert!(!is_reasoning_request("claude-thinking-pro"));
    }
}
