//! LLM abstractions, shared types, and the commit generation pipeline.
//!
//! The pipeline is three stages: [`prompt::build_commit_prompt`] (pure),
//! [`LLMProvider::send_prompt`] (the only I/O), and
//! [`sanitize_commit_message`](provider::base::sanitize_commit_message) (pure).

/// Prompt-building utilities for commit generation.
pub mod prompt;
/// Built-in provider implementations and factory helpers.
pub mod provider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::constants::commit::FALLBACK_MESSAGE;
use crate::error::Result;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Unified interface implemented by chat-completion backends.
///
/// # Architecture
///
/// The only **required** method is [`send_prompt`], which sends a pre-built
/// `(system, user)` prompt pair to the LLM and returns the raw completion.
/// Prompt construction and sanitizing live outside the trait (see
/// [`generate_commit_message`]) so a test double only has to fake the
/// network call.
///
/// # Implementer Notes
/// 1. Implement `Send + Sync` (required in async contexts).
/// 2. Every failure must come back as
///    [`GcopError::BackendUnavailable`](crate::error::GcopError::BackendUnavailable).
/// 3. Do not retry; retry policy belongs to the caller.
///
/// # Built-In Implementations
/// - [`OpenAIProvider`](provider::openai::OpenAIProvider) - OpenAI-compatible API (Ollama, vLLM, LM Studio, ...)
///
/// [`send_prompt`]: LLMProvider::send_prompt
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Sends a pre-built prompt pair to the LLM and returns the first choice's text.
    async fn send_prompt(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;

    /// Provider name (used for logs and error messages).
    fn name(&self) -> &str;

    /// Model identifier reported by the health endpoint.
    fn model(&self) -> &str;
}

/// Context passed to commit-message generation.
///
/// One per request, immutable. `diff_text` must already be checked for
/// blankness by the caller.
///
/// # Example
/// ```
/// use gcop_server::llm::CommitContext;
///
/// let context = CommitContext {
///     diff_text: "diff --git a/src/main.rs b/src/main.rs".to_string(),
///     branch_name: "feature/JIRA-123-login".to_string(),
///     changed_files: vec!["src/main.rs".to_string()],
///     author_name: "Jane".to_string(),
///     existing_message: String::new(),
/// };
/// assert!(!context.is_diff_blank());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitContext {
    /// Raw git diff.
    pub diff_text: String,
    /// Current branch name.
    pub branch_name: String,
    /// Changed file paths, in the order the client sent them.
    pub changed_files: Vec<String>,
    /// Commit author.
    pub author_name: String,
    /// Message already in the editor, possibly empty.
    pub existing_message: String,
}

impl CommitContext {
    /// `true` when the diff is empty or only whitespace.
    pub fn is_diff_blank(&self) -> bool {
        self.diff_text.trim().is_empty()
    }
}

/// System instruction plus per-request user prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system_instruction: String,
    pub user_prompt: String,
}

/// Builds the prompt, calls the provider once, and sanitizes the result.
///
/// An empty completion is not an error: the fallback message is returned and
/// a warning is logged.
pub async fn generate_commit_message(
    provider: &dyn LLMProvider,
    context: &CommitContext,
) -> Result<String> {
    let prompt = prompt::build_commit_prompt(context);
    tracing::debug!(
        "Commit prompt split - system ({} chars), user ({} chars)",
        prompt.system_instruction.chars().count(),
        prompt.user_prompt.chars().count()
    );

    let raw = provider
        .send_prompt(&prompt.system_instruction, &prompt.user_prompt)
        .await?;
    tracing::debug!("Raw completion from {}: {:?}", provider.name(), raw);

    let message = provider::base::sanitize_commit_message(&raw);
    if message == FALLBACK_MESSAGE {
        tracing::warn!(
            "{} returned an unusable completion, using fallback message",
            provider.name()
        );
    }
    Ok(message)
}
