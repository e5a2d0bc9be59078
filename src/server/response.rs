//! Mapping from [`GcopError`] to HTTP responses.

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::GcopError;

impl IntoResponse for GcopError {
    /// Body is always `{"detail": ...}`: the field-error list for
    /// validation failures, a string otherwise.
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.is_operational() {
            // 完整原因只进日志
            tracing::error!("{}", self);
        }

        let body = match &self {
            GcopError::Validation(errors) => json!({ "detail": errors }),
            other => json!({ "detail": other.client_detail() }),
        };

        let mut response = (status, Json(body)).into_response();
        let headers = response.headers_mut();
        if self.is_auth_error() {
            headers.insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        if let GcopError::RateLimited {
            retry_after_secs, ..
        } = &self
        {
            headers.insert(header::RETRY_AFTER, HeaderValue::from(*retry_after_secs));
        }
        response
    }
}
