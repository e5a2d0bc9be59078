//! Response handling and cleaning
//!
//! Turn a raw chat completion into a single clean commit subject line.

use crate::constants::commit::FALLBACK_MESSAGE;

/// Error preview maximum length
const ERROR_PREVIEW_LENGTH: usize = 500;

/// Strip one matching pair of surrounding `"` or `'`.
///
/// A quote on only one side is left alone.
fn strip_matching_quotes(text: &str) -> &str {
    for quote in ['"', '\''] {
        if text.len() >= 2
            && let Some(inner) = text
                .strip_prefix(quote)
                .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    text
}

/// Looks like the `text` in a ```` ```text ```` fence opener.
fn is_language_tag(tag: &str) -> bool {
    let tag = tag.trim_end_matches('\r');
    !tag.is_empty()
        && tag.len() <= 20
        && tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '_'))
}

/// Strip leading/trailing backticks together with surrounding whitespace.
///
/// An opening fence may carry a language tag, which is dropped with it.
fn strip_fences(text: &str) -> &str {
    let mut inner = text;
    if let Some(rest) = text.strip_prefix("```") {
        let rest = rest.trim_start_matches('`');
        inner = match rest.split_once('\n') {
            Some((tag, body)) if is_language_tag(tag) => body,
            _ => rest,
        };
    }
    inner.trim_matches(|c: char| c == '`' || c.is_whitespace())
}

/// One pass of the cleaning pipeline (without the fallback).
fn clean_once(response: &str) -> &str {
    let trimmed = response.trim();
    let unquoted = strip_matching_quotes(trimmed);
    let unfenced = strip_fences(unquoted);
    unfenced.lines().next().unwrap_or_default().trim()
}

/// Clean commit message response.
///
/// LLMs sometimes wrap the subject in quotes or code fences, or keep talking
/// after the first line:
/// ````text
/// ```
/// feat(auth): add login
/// ```
/// ````
/// Steps: trim, strip one matching quote pair, strip backtick fences, keep the
/// first line. The pass repeats until nothing changes, so `'"x"'` and
/// fenced-then-quoted output end up clean and the function is idempotent.
///
/// Returns an empty string if nothing is left.
pub fn clean_commit_response(response: &str) -> String {
    let mut current = response;
    loop {
        let next = clean_once(current);
        if next == current {
            return next.to_string();
        }
        current = next;
    }
}

/// Clean a completion and substitute [`FALLBACK_MESSAGE`] if nothing usable remains.
///
/// Always returns a non-empty single line.
///
/// # Example
/// ```
/// use gcop_server::llm::provider::base::sanitize_commit_message;
///
/// assert_eq!(sanitize_commit_message("  'fix: correct rounding'  "), "fix: correct rounding");
/// assert_eq!(sanitize_commit_message("feat: add X\nExtra detail"), "feat: add X");
/// assert_eq!(sanitize_commit_message("   "), "chore: Automatic generation failed");
/// ```
pub fn sanitize_commit_message(response: &str) -> String {
    let cleaned = clean_commit_response(response);
    if cleaned.is_empty() {
        FALLBACK_MESSAGE.to_string()
    } else {
        cleaned
    }
}

/// Truncate string for error preview (safe handling of multibyte characters)
pub fn truncate_for_preview(s: &str) -> String {
    if s.len() <= ERROR_PREVIEW_LENGTH {
        return s.to_string();
    }
    // Find the last char boundary that does not exceed max_len
    let boundary = s
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= ERROR_PREVIEW_LENGTH)
        .last()
        .unwrap_or(0);
    format!("{}...", &s[..boundary])
}
