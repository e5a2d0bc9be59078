//! Outbound HTTP timeouts.

use serde::{Deserialize, Serialize};

use crate::error::{GcopError, Result};

/// Network configuration.
///
/// Bounds every call to the LLM backend. There are no retries; a call that
/// runs past `request_timeout` fails the request with 503.
///
/// # Fields
/// - `request_timeout`: whole-request timeout in seconds (default: `30`)
/// - `connect_timeout`: TCP/TLS connect timeout in seconds (default: `10`)
///
/// # Example
/// ```toml
/// [network]
/// request_timeout = 60
/// connect_timeout = 5
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
    /// Whole-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Connect timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

impl NetworkConfig {
    /// Validates network configuration.
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout == 0 {
            return Err(GcopError::Config(
                "network.request_timeout cannot be 0".into(),
            ));
        }
        if self.connect_timeout == 0 {
            return Err(GcopError::Config(
                "network.connect_timeout cannot be 0".into(),
            ));
        }
        Ok(())
    }
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}
