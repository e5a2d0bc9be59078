use std::sync::LazyLock;

use regex_lite::Regex;

use crate::constants::prompt::{
    MAX_DIFF_CHARS, MAX_LISTED_FILES, MERGE_NOTE_PREVIEW_CHARS, TRUNCATION_MARKER,
};
use crate::llm::{CommitContext, PromptPair};

/// Static system directives
const COMMIT_SYSTEM_PROMPT: &str = r#"You are an expert programmer reviewing code changes and writing git commit messages.

Rules:
- Follow the Conventional Commits specification: type: description (e.g. 'feat: add user login', 'fix: resolve calculation error', 'chore: update dependencies', 'docs: explain API endpoint')
- Use the imperative mood ("add", not "added" or "adds")
- Output a single line, ideally under 72 characters
- Do not use backticks, markdown, quotes, or labels such as "Commit message:"
- Focus on *what* the change achieves and *why*, not just *how*
- Output ONLY the commit message subject, no explanation"#;

const INSTRUCTION_LINE: &str =
    "Generate a concise Conventional Commit message subject for the following change.";

const FINAL_LINE: &str = "Generate the single-line commit message subject now:";

const MERGE_MARKERS: [&str; 2] = ["Merge pull request #", "Merge branch "];

static TICKET_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[a-z]+-[0-9]+").expect("ticket pattern is valid"));

/// First ticket-like id (`ABC-123`) in a branch name, uppercased.
///
/// ```
/// use gcop_server::llm::prompt::extract_ticket_id;
///
/// assert_eq!(extract_ticket_id("feature/jira-42-login"), Some("JIRA-42".to_string()));
/// assert_eq!(extract_ticket_id("feature/update-docs"), None);
/// ```
pub fn extract_ticket_id(branch_name: &str) -> Option<String> {
    TICKET_PATTERN
        .find(branch_name)
        .map(|m| m.as_str().to_uppercase())
}

/// Whether the message looks like the default text git/GitHub put there for a merge.
pub fn is_default_merge_message(message: &str) -> bool {
    MERGE_MARKERS.iter().any(|marker| message.contains(marker))
}

/// First `max_chars` characters of `text`, and whether anything was cut.
fn take_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => (&text[..byte_idx], true),
        None => (text, false),
    }
}

/// Diff as it goes into the prompt: verbatim, or the first
/// [`MAX_DIFF_CHARS`] characters plus [`TRUNCATION_MARKER`].
pub fn truncate_diff(diff: &str) -> String {
    let (head, truncated) = take_chars(diff, MAX_DIFF_CHARS);
    if truncated {
        tracing::debug!(
            "Diff truncated to {} chars (original {} bytes)",
            MAX_DIFF_CHARS,
            diff.len()
        );
        format!("{}{}", head, TRUNCATION_MARKER)
    } else {
        head.to_string()
    }
}

fn format_ticket_hint(branch_name: &str) -> String {
    match extract_ticket_id(branch_name) {
        Some(ticket) => format!(
            "\n- Potential Ticket ID from branch: {} (you may reference it in a commit body, but do NOT put it in the subject line unless essential)",
            ticket
        ),
        None => String::new(),
    }
}

fn format_changed_files(files: &[String]) -> String {
    if files.is_empty() {
        return String::new();
    }
    let mut result = String::from("\n- Changed Files:");
    for file in files.iter().take(MAX_LISTED_FILES) {
        result.push_str(&format!("\n  - {}", file));
    }
    if files.len() > MAX_LISTED_FILES {
        result.push_str(&format!(
            "\n  - ... ({} more)",
            files.len() - MAX_LISTED_FILES
        ));
    }
    result
}

fn format_existing_message(existing: &str) -> String {
    let trimmed = existing.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    if is_default_merge_message(trimmed) {
        let (preview, _) = take_chars(trimmed, MERGE_NOTE_PREVIEW_CHARS);
        return format!(
            "\n- Note: The existing message ('{}...') seems like a default merge message. Ignore it and generate a new message based only on the diff and context.",
            preview
        );
    }

    let first_line = trimmed.lines().next().unwrap_or_default().trim();
    format!(
        "\n- Existing Message Draft: '{}' (refine it or replace it if it does not describe the change)",
        first_line
    )
}

/// Build context section
fn build_context_section(context: &CommitContext) -> String {
    format!(
        "# Context:\n- Branch: {}\n- Author: {}{}{}{}",
        context.branch_name,
        context.author_name,
        format_ticket_hint(&context.branch_name),
        format_changed_files(&context.changed_files),
        format_existing_message(&context.existing_message),
    )
}

/// Build split commit prompt (system + user)
///
/// - `system_instruction`: static rules
/// - `user_prompt`: context + diff, rebuilt per request
///
/// Pure function: same context, same prompt.
pub fn build_commit_prompt(context: &CommitContext) -> PromptPair {
    let user_prompt = format!(
        "{}\n\n{}\n\n# Git Diff:\n```diff\n{}\n```\n\n{}",
        INSTRUCTION_LINE,
        build_context_section(context),
        truncate_diff(&context.diff_text),
        FINAL_LINE
    );

    PromptPair {
        system_instruction: COMMIT_SYSTEM_PROMPT.to_string(),
        user_prompt,
    }
}
