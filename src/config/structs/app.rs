//! Top-level application configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::llm::LLMConfig;
use super::network::NetworkConfig;
use super::server::ServerConfig;

/// Application configuration.
///
/// Effective configuration is merged from multiple sources (low to high):
/// 1. Rust defaults (`Default` + `serde(default)`)
/// 2. Config file (`GCOP_SERVER_CONFIG`, or the platform config directory)
/// 3. `GCOP_SERVER__*` environment variables
/// 4. Deployment variables (`API_SECRET_KEY`, `RATE_LIMIT`, `LLM_BASE_URL`,
///    `LLM_BASE_PORT`, `OLLAMA_MODEL`, `LLM_API_KEY`, `REQUEST_TIMEOUT`)
///
/// # Configuration File Locations
/// - Linux: `~/.config/gcop-server/config.toml`
/// - macOS: `~/Library/Application Support/gcop-server/config.toml`
/// - Windows: `%APPDATA%\gcop-server\config\config.toml`
///
/// # Example
/// ```toml
/// [server]
/// api_secret_key = "change-me"
/// rate_limit = "10/minute"
///
/// [llm]
/// base_url = "http://localhost"
/// port = 11434
/// model = "llama3"
///
/// [network]
/// request_timeout = 30
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AppConfig {
    /// Listener, auth and rate-limit settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// LLM backend settings.
    #[serde(default)]
    pub llm: LLMConfig,

    /// Outbound HTTP timeouts.
    #[serde(default)]
    pub network: NetworkConfig,
}

impl AppConfig {
    /// Validates configuration consistency.
    ///
    /// Called once at startup; a failure aborts the process before the
    /// listener binds.
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.llm.validate()?;
        self.network.validate()?;
        Ok(())
    }
}
