use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GcopError>;

/// Client-facing detail for backend failures. The real cause only goes to the log.
pub const BACKEND_UNAVAILABLE_DETAIL: &str =
    "Failed to generate commit message due to an internal server error.";

/// One field-level problem in a request body.
///
/// Serialized in the `{"loc": [...], "msg": ..., "type": ...}` shape that
/// existing API clients already parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Location of the problem, e.g. `["body", "diff_text"]`.
    pub loc: Vec<String>,
    /// Human readable message.
    pub msg: String,
    /// Machine readable kind (`missing`, `string_type`, `list_type`, ...).
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    pub fn new(field: &str, msg: impl Into<String>, kind: impl Into<String>) -> Self {
        let mut loc = vec!["body".to_string()];
        if !field.is_empty() {
            loc.push(field.to_string());
        }
        Self {
            loc,
            msg: msg.into(),
            kind: kind.into(),
        }
    }
}

/// Why a call to the LLM backend failed.
///
/// Callers never branch on this; it exists so the log line says what happened.
#[derive(Error, Debug)]
pub enum BackendFailure {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

#[derive(Error, Debug)]
pub enum GcopError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration parsing error: {0}")]
    ConfigParse(#[from] config::ConfigError),

    #[error("Request validation failed ({} field error(s))", .0.len())]
    Validation(Vec<FieldError>),

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Invalid authentication credentials")]
    InvalidCredentials,

    #[error("Invalid or expired token.")]
    InvalidToken,

    #[error("diff_text cannot be empty.")]
    EmptyDiff,

    #[error("Rate limit exceeded: {limit}")]
    RateLimited { limit: String, retry_after_secs: u64 },

    #[error("LLM backend '{provider}' unavailable: {cause}")]
    BackendUnavailable {
        provider: String,
        #[source]
        cause: BackendFailure,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GcopError {
    /// Wraps any backend failure into the single kind callers see.
    pub fn backend(provider: impl Into<String>, cause: impl Into<BackendFailure>) -> Self {
        GcopError::BackendUnavailable {
            provider: provider.into(),
            cause: cause.into(),
        }
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            GcopError::Validation(_) => 422,
            GcopError::Unauthenticated | GcopError::InvalidCredentials | GcopError::InvalidToken => {
                403
            }
            GcopError::EmptyDiff => 400,
            GcopError::RateLimited { .. } => 429,
            GcopError::BackendUnavailable { .. } => 503,
            GcopError::Config(_) | GcopError::ConfigParse(_) | GcopError::Io(_) => 500,
        }
    }

    /// Whether the response must carry `WWW-Authenticate: Bearer`.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            GcopError::Unauthenticated | GcopError::InvalidCredentials | GcopError::InvalidToken
        )
    }

    /// Text safe to hand to a client. Never contains backend causes or secrets.
    pub fn client_detail(&self) -> String {
        match self {
            GcopError::BackendUnavailable { .. } => BACKEND_UNAVAILABLE_DETAIL.to_string(),
            GcopError::Config(_) | GcopError::ConfigParse(_) | GcopError::Io(_) => {
                "Internal server error.".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Errors operators should be alerted about.
    pub fn is_operational(&self) -> bool {
        matches!(
            self,
            GcopError::BackendUnavailable { .. }
                | GcopError::Config(_)
                | GcopError::ConfigParse(_)
                | GcopError::Io(_)
        )
    }
}
