//! Test utilities for provider tests
//!
//! Common configuration builders shared by the provider test suites.

use crate::config::{LLMConfig, NetworkConfig};

/// 在测试中安装 rustls crypto provider
///
/// reqwest 0.13 + rustls-no-provider 需要手动安装 crypto provider，
/// 生产代码在 main.rs 中完成，测试需要单独调用。
/// 多次调用是安全的（install_default 失败时忽略即可）。
pub fn ensure_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// `NetworkConfig` with short timeouts so failing tests finish quickly
pub fn test_network_config() -> NetworkConfig {
    NetworkConfig {
        request_timeout: 5,
        connect_timeout: 2,
    }
}

/// `LLMConfig` pointing at a mock server
///
/// # Parameters
/// - `base_url` - Mock server URL (e.g., from `mockito::Server`), port included
pub fn test_llm_config(base_url: String) -> LLMConfig {
    LLMConfig {
        base_url,
        model: "test-model".to_string(),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_config_uses_base_url() {
        let config = test_llm_config("http://127.0.0.1:1234".to_string());
        assert_eq!(config.base_url, "http://127.0.0.1:1234");
        assert_eq!(config.model, "test-model");
        assert_eq!(config.api_key.as_deref(), Some("ollama"));
    }

    #[test]
    fn test_network_config_is_short() {
        let config = test_network_config();
        assert!(config.request_timeout <= 5);
        assert!(config.connect_timeout <= config.request_timeout);
    }
}
