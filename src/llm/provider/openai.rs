use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::base::{build_endpoint, extract_api_key, send_llm_request};
use crate::config::{LLMConfig, NetworkConfig};
use crate::error::{BackendFailure, GcopError, Result};
use crate::llm::LLMProvider;

/// OpenAI-compatible chat completions provider
///
/// Talks to any server that implements `POST /v1/chat/completions`:
/// Ollama (default), vLLM, LM Studio, llama.cpp server, or OpenAI itself.
///
/// # Configuration example
/// ```toml
/// [llm]
/// base_url = "http://localhost"
/// port = 11434
/// model = "llama3"
/// temperature = 0.5
/// max_tokens = 75
/// ```
///
/// # Features
/// - One request per call, no retries
/// - Request timeout from `[network]`
/// - Every failure is reported as `BackendUnavailable`
pub struct OpenAIProvider {
    name: String,
    client: Client,
    api_key: Option<String>,
    endpoint: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: [MessagePayload<'a>; 2],
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize)]
struct MessagePayload<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: Option<String>,
}

impl OpenAIProvider {
    /// Builds an OpenAI-compatible provider from runtime configuration.
    pub fn new(
        config: &LLMConfig,
        provider_name: &str,
        network_config: &NetworkConfig,
    ) -> Result<Self> {
        Ok(Self {
            name: provider_name.to_string(),
            client: super::create_http_client(network_config)?,
            api_key: extract_api_key(config),
            endpoint: build_endpoint(config),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    /// Resolved chat-completions URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn send_prompt(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let request = OpenAIRequest {
            model: &self.model,
            messages: [
                MessagePayload {
                    role: "system",
                    content: system_prompt,
                },
                MessagePayload {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stream: false,
        };

        tracing::debug!(
            "OpenAI API request: model={}, temperature={}, max_tokens={}, system_len={}, user_len={}",
            self.model,
            self.temperature,
            self.max_tokens,
            system_prompt.len(),
            user_prompt.len()
        );

        let auth_header = self.api_key.as_ref().map(|key| format!("Bearer {}", key));
        let headers: Vec<(&str, &str)> = auth_header
            .as_deref()
            .map(|value| vec![("Authorization", value)])
            .unwrap_or_default();

        let response: OpenAIResponse =
            send_llm_request(&self.client, &self.endpoint, &headers, &request, &self.name)
                .await?;

        let choice = response.choices.into_iter().next().ok_or_else(|| {
            GcopError::backend(
                &self.name,
                BackendFailure::Malformed("response contained no choices".into()),
            )
        })?;

        choice.message.content.ok_or_else(|| {
            GcopError::backend(
                &self.name,
                BackendFailure::Malformed("first choice has no message content".into()),
            )
        })
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use pretty_assertions::assert_eq;

    use crate::llm::provider::test_utils::{
        ensure_crypto_provider, test_llm_config, test_network_config,
    };

    fn provider_for(server: &mockito::ServerGuard) -> OpenAIProvider {
        OpenAIProvider::new(
            &test_llm_config(server.url()),
            "ollama",
            &test_network_config(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_openai_success_response_parsing() {
        ensure_crypto_provider();
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"feat: add login"}}]}"#)
            .create_async()
            .await;

        let provider = provider_for(&server);
        let result = provider.send_prompt("system", "user").await.unwrap();
        assert_eq!(result, "feat: add login");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_openai_request_shape() {
        ensure_crypto_provider();
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer ollama")
            .match_body(Matcher::Json(serde_json::json!({
                "model": "test-model",
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "usr"}
                ],
                "temperature": 0.5,
                "max_tokens": 75,
                "stream": false
            })))
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"ok"}}]}"#)
            .create_async()
            .await;

        let provider = provider_for(&server);
        provider.send_prompt("sys", "usr").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_openai_without_api_key_sends_no_auth_header() {
        ensure_crypto_provider();
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"ok"}}]}"#)
            .create_async()
            .await;

        let mut config = test_llm_config(server.url());
        config.api_key = None;
        let provider = OpenAIProvider::new(&config, "ollama", &test_network_config()).unwrap();
        provider.send_prompt("s", "u").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_openai_api_error_500() {
        ensure_crypto_provider();
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(500)
            .with_body("model 'llama3' not found")
            .create_async()
            .await;

        let provider = provider_for(&server);
        let err = provider.send_prompt("system", "hi").await.unwrap_err();
        assert!(matches!(
            err,
            GcopError::BackendUnavailable {
                cause: BackendFailure::Status { status: 500, .. },
                ..
            }
        ));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_openai_no_choices() {
        ensure_crypto_provider();
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let provider = provider_for(&server);
        let err = provider.send_prompt("system", "hi").await.unwrap_err();
        assert!(matches!(
            err,
            GcopError::BackendUnavailable {
                cause: BackendFailure::Malformed(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_openai_null_content() {
        ensure_crypto_provider();
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":null}}]}"#)
            .create_async()
            .await;

        let provider = provider_for(&server);
        let err = provider.send_prompt("system", "hi").await.unwrap_err();
        assert!(matches!(err, GcopError::BackendUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_openai_empty_content_is_not_an_error() {
        ensure_crypto_provider();
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":""}}]}"#)
            .create_async()
            .await;

        let provider = provider_for(&server);
        assert_eq!(provider.send_prompt("system", "hi").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_openai_endpoint_and_metadata() {
        ensure_crypto_provider();
        let server = Server::new_async().await;
        let provider = provider_for(&server);
        assert_eq!(
            provider.endpoint(),
            format!("{}/v1/chat/completions", server.url())
        );
        assert_eq!(LLMProvider::name(&provider), "ollama");
        assert_eq!(provider.model(), "test-model");
    }
}
