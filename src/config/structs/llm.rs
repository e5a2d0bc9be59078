//! LLM backend configuration.

use serde::{Deserialize, Serialize};

use crate::constants::llm::{
    DEFAULT_API_KEY, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
};
use crate::error::{GcopError, Result};
use crate::llm::provider::utils::{DEFAULT_OLLAMA_HOST, DEFAULT_OLLAMA_PORT, mask_api_key};

/// LLM configuration.
///
/// Points the service at one OpenAI-compatible chat-completions backend.
/// The endpoint is `<base_url>:<port>/v1/chat/completions`; a `base_url`
/// that already names a port is used as is.
///
/// # Fields
/// - `base_url`: backend scheme and host (default: `"http://localhost"`)
/// - `port`: backend port (default: `11434`)
/// - `model`: model id (default: `"llama3"`)
/// - `api_key`: Bearer key sent upstream (default: `"ollama"`)
/// - `temperature`: sampling temperature (default: `0.5`)
/// - `max_tokens`: completion budget (default: `75`)
///
/// # Example
/// ```toml
/// [llm]
/// base_url = "http://host.docker.internal"
/// port = 11434
/// model = "qwen2.5-coder:7b"
/// temperature = 0.4
/// ```
#[derive(Clone, Deserialize, Serialize)]
pub struct LLMConfig {
    /// Backend scheme and host, optionally with port and path.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Backend port, ignored when `base_url` carries one.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Model id.
    #[serde(default = "default_model")]
    pub model: String,

    /// API key. Ollama accepts any value.
    #[serde(default = "default_api_key")]
    pub api_key: Option<String>,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum completion tokens.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            port: default_port(),
            model: default_model(),
            api_key: default_api_key(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl std::fmt::Debug for LLMConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let masked_key = self.api_key.as_deref().map(mask_api_key);
        f.debug_struct("LLMConfig")
            .field("base_url", &self.base_url)
            .field("port", &self.port)
            .field("model", &self.model)
            .field("api_key", &masked_key)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl LLMConfig {
    /// Validates LLM configuration.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(GcopError::Config("llm.model cannot be empty".into()));
        }
        let base = self.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(GcopError::Config(format!(
                "llm.base_url '{}' must start with http:// or https://",
                self.base_url
            )));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(GcopError::Config(format!(
                "llm.temperature {} out of range [0.0, 2.0]",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(GcopError::Config("llm.max_tokens cannot be 0".into()));
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    DEFAULT_OLLAMA_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_OLLAMA_PORT
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_key() -> Option<String> {
    Some(DEFAULT_API_KEY.to_string())
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}
