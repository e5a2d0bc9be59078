//! Provider configuration extraction tool
//!
//! Resolves endpoint and sampling parameters from [`LLMConfig`].

use crate::config::LLMConfig;

use super::super::utils::{OPENAI_API_SUFFIX, complete_endpoint, has_explicit_port};

/// Build the chat-completions endpoint
///
/// `base_url` plus `port`, unless the base URL already names a port, then the
/// OpenAI path suffix.
///
/// # Example
/// ```
/// use gcop_server::config::LLMConfig;
/// use gcop_server::llm::provider::base::build_endpoint;
///
/// let config = LLMConfig {
///     base_url: "http://localhost/".to_string(),
///     port: 11434,
///     ..Default::default()
/// };
/// assert_eq!(build_endpoint(&config), "http://localhost:11434/v1/chat/completions");
/// ```
pub fn build_endpoint(config: &LLMConfig) -> String {
    let base = config.base_url.trim_end_matches('/');
    let base = if has_explicit_port(base) {
        base.to_string()
    } else {
        format!("{}:{}", base, config.port)
    };
    complete_endpoint(&base, OPENAI_API_SUFFIX)
}

/// API key to send, `None` when blank.
pub fn extract_api_key(config: &LLMConfig) -> Option<String> {
    config
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
}
