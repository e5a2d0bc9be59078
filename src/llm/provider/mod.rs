pub mod base;
pub mod openai;
pub mod utils;

#[cfg(test)]
pub mod test_utils;

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::config::{AppConfig, NetworkConfig};
use crate::error::{GcopError, Result};
use crate::llm::LLMProvider;

/// Provider 名称（日志和错误信息中使用）
pub const DEFAULT_PROVIDER_NAME: &str = "ollama";

/// 创建 HTTP 客户端
///
/// 启动时创建一次，由 provider 持有；reqwest 的 `Client` 内部是连接池，clone 很便宜。
/// `request_timeout` 覆盖整个请求（连接 + 等待模型 + 读 body）。
pub(crate) fn create_http_client(network_config: &NetworkConfig) -> Result<Client> {
    let user_agent = format!(
        "{}/{} ({})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(network_config.request_timeout))
        .connect_timeout(Duration::from_secs(network_config.connect_timeout))
        .build()
        .map_err(|e| GcopError::Config(format!("Failed to create HTTP client: {}", e)))
}

/// 根据配置创建 LLM Provider
///
/// 配置必须已经通过 [`AppConfig::validate`]。
pub fn create_provider(config: &AppConfig) -> Result<Arc<dyn LLMProvider>> {
    let provider =
        openai::OpenAIProvider::new(&config.llm, DEFAULT_PROVIDER_NAME, &config.network)?;
    tracing::info!("Configuring LLM client:");
    tracing::info!("  API endpoint: {}", provider.endpoint());
    tracing::info!("  Model: {}", provider.model());
    Ok(Arc::new(provider))
}
