//! HTTP listener, authentication and rate-limit settings.

use serde::{Deserialize, Serialize};

use crate::constants::server::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_RATE_LIMIT};
use crate::error::{GcopError, Result};
use crate::llm::provider::utils::mask_api_key;
use crate::server::rate_limit::RateLimit;

/// Server configuration.
///
/// # Fields
/// - `host`: bind address (default: `"0.0.0.0"`)
/// - `port`: bind port (default: `8000`)
/// - `api_secret_key`: shared Bearer secret, required
/// - `rate_limit`: per-client limit expression (default: `"10/minute"`)
///
/// # Example
/// ```toml
/// [server]
/// host = "127.0.0.1"
/// port = 8000
/// api_secret_key = "change-me"
/// rate_limit = "30/minute"
/// ```
#[derive(Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Shared secret clients present as `Authorization: Bearer <secret>`.
    ///
    /// There is no default; startup fails without it.
    #[serde(default)]
    pub api_secret_key: Option<String>,

    /// Rate limit expression, e.g. `10/minute`, `100 per hour`, `5/30 seconds`.
    #[serde(default = "default_rate_limit")]
    pub rate_limit: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_secret_key: None,
            rate_limit: default_rate_limit(),
        }
    }
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let masked_secret = self.api_secret_key.as_deref().map(mask_api_key);
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_secret_key", &masked_secret)
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}

impl ServerConfig {
    /// The configured secret, trimmed.
    ///
    /// Errors when it is missing or blank.
    pub fn api_secret(&self) -> Result<&str> {
        self.api_secret_key
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                GcopError::Config(
                    "API_SECRET_KEY is not set. Set it in the environment or in [server] api_secret_key."
                        .into(),
                )
            })
    }

    /// Parsed rate limit.
    pub fn parsed_rate_limit(&self) -> Result<RateLimit> {
        self.rate_limit.parse()
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Validates server configuration.
    pub fn validate(&self) -> Result<()> {
        self.api_secret()?;
        if self.host.trim().is_empty() {
            return Err(GcopError::Config("server.host cannot be empty".into()));
        }
        self.parsed_rate_limit()?;
        Ok(())
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_rate_limit() -> String {
    DEFAULT_RATE_LIMIT.to_string()
}
