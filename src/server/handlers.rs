use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;

use super::AppState;
use super::auth::authorize;
use super::payload::{CommitMessageResponse, HealthResponse, parse_commit_request};
use crate::constants::server::LOG_PREVIEW_CHARS;
use crate::error::{GcopError, Result};
use crate::llm::{self, CommitContext};

/// `GET /`: liveness plus the configured model. No auth.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model: state.provider.model().to_string(),
    })
}

/// `POST /generate_commit_message`
///
/// Order of checks: token, body shape, blank diff. The backend is only
/// called once all three pass.
pub async fn generate_commit_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CommitMessageResponse>> {
    authorize(&headers, &state.api_secret_key)?;

    let context: CommitContext = parse_commit_request(&body)?.into();

    tracing::info!(
        "Received request: branch='{}', author='{}', files={}, diff_len={}",
        context.branch_name,
        context.author_name,
        context.changed_files.len(),
        context.diff_text.chars().count()
    );
    tracing::debug!("Changed files: {:?}", context.changed_files);
    if !context.existing_message.trim().is_empty() {
        tracing::debug!("Existing message: {:?}", context.existing_message);
    }

    if context.is_diff_blank() {
        tracing::warn!("Rejected request with empty diff_text");
        return Err(GcopError::EmptyDiff);
    }

    let commit_message = llm::generate_commit_message(state.provider.as_ref(), &context).await?;

    let preview: String = commit_message.chars().take(LOG_PREVIEW_CHARS).collect();
    tracing::info!("Generated commit message: '{}'", preview);

    Ok(Json(CommitMessageResponse { commit_message }))
}
