//! Bearer-token check for the generation endpoint.

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;

use crate::error::{GcopError, Result};

/// Checks `Authorization: Bearer <token>` against the configured secret.
///
/// - header missing, empty, or without credentials: [`GcopError::Unauthenticated`]
/// - scheme other than `Bearer` (any case): [`GcopError::InvalidCredentials`]
/// - token mismatch: [`GcopError::InvalidToken`]
pub fn authorize(headers: &HeaderMap, secret: &str) -> Result<()> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(GcopError::Unauthenticated)?;

    let (scheme, credentials) = value.split_once(' ').unwrap_or((value, ""));
    let credentials = credentials.trim();
    if credentials.is_empty() {
        return Err(GcopError::Unauthenticated);
    }
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(GcopError::InvalidCredentials);
    }

    if !constant_time_eq(credentials.as_bytes(), secret.as_bytes()) {
        tracing::warn!("Rejected request with an invalid API token");
        return Err(GcopError::InvalidToken);
    }
    Ok(())
}

/// Compares without short-circuiting on the first differing byte.
///
/// Length is not hidden.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
