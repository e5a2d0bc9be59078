//! Provider utility functions
//!
//! URL handling for OpenAI-compatible backends and secret masking for logs.

/// OpenAI API endpoint suffix
pub const OPENAI_API_SUFFIX: &str = "/v1/chat/completions";

/// Ollama default host (the port is configured separately)
pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost";

/// Ollama default port
pub const DEFAULT_OLLAMA_PORT: u16 = 11434;

/// Smart completion API endpoint
///
/// # Behavior
/// 1. Remove trailing slashes
/// 2. Keep the URL if it already ends with the suffix (or a custom deep path)
/// 3. Append only the missing tail when the URL ends with a prefix of the suffix
///
/// # Example
/// ```
/// use gcop_server::llm::provider::utils::complete_endpoint;
///
/// assert_eq!(
///     complete_endpoint("http://localhost:11434", "/v1/chat/completions"),
///     "http://localhost:11434/v1/chat/completions"
/// );
/// assert_eq!(
///     complete_endpoint("http://gpu-box:8000/v1/", "/v1/chat/completions"),
///     "http://gpu-box:8000/v1/chat/completions"
/// );
/// ```
pub fn complete_endpoint(base_url: &str, expected_suffix: &str) -> String {
    let url = base_url.trim_end_matches('/');
    let suffix = expected_suffix.trim_start_matches('/');

    if url.ends_with(suffix) {
        return url.to_string();
    }

    // url 以 suffix 的前缀结尾时（如 ".../v1"），只补剩余部分
    let parts: Vec<&str> = suffix.split('/').collect();
    for i in (0..parts.len()).rev() {
        let head = parts[..=i].join("/");
        if url.ends_with(&format!("/{}", head)) {
            let tail = parts[i + 1..].join("/");
            if tail.is_empty() {
                return url.to_string();
            }
            return format!("{}/{}", url, tail);
        }
    }

    if is_complete_api_path(url) {
        return url.to_string();
    }

    format!("{}/{}", url, suffix)
}

/// Path depth >= 2 (e.g. `/openai/chat`) is treated as a user-supplied full endpoint.
fn is_complete_api_path(url: &str) -> bool {
    let path = strip_scheme(url)
        .split_once('/')
        .map(|(_, path)| path)
        .unwrap_or("");
    path.split('/').filter(|s| !s.is_empty()).count() >= 2
}

fn strip_scheme(url: &str) -> &str {
    url.strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .unwrap_or(url)
}

/// Whether the URL's authority already carries a port
///
/// # Example
/// ```
/// use gcop_server::llm::provider::utils::has_explicit_port;
///
/// assert!(has_explicit_port("http://localhost:11434"));
/// assert!(has_explicit_port("http://[::1]:8080/v1"));
/// assert!(!has_explicit_port("http://localhost/v1"));
/// assert!(!has_explicit_port("http://[::1]"));
/// ```
pub fn has_explicit_port(url: &str) -> bool {
    let authority = strip_scheme(url).split('/').next().unwrap_or_default();
    // IPv6 字面量：端口在 ']' 之后
    let host_end = authority.rfind(']').map(|i| i + 1).unwrap_or(0);
    authority[host_end..].contains(':')
}

/// Mask a secret to prevent log leaks
///
/// - length > 8: first 4 characters + `...` + last 4 characters
/// - otherwise: `****`
///
/// # Example
/// ```
/// use gcop_server::llm::provider::utils::mask_api_key;
///
/// assert_eq!(mask_api_key("s3cr3t-token-value"), "s3cr...alue");
/// assert_eq!(mask_api_key("ollama"), "****");
/// ```
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        "****".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mask_api_key() {
        assert_eq!(mask_api_key("test_secret_key_123"), "test..._123");
        assert_eq!(mask_api_key("12345678"), "****");
        assert_eq!(mask_api_key(""), "****");
        assert_eq!(mask_api_key("123456789"), "1234...6789");
    }

    #[test]
    fn test_mask_api_key_multibyte() {
        // 不能在字符中间切开
        assert_eq!(mask_api_key("密钥密钥密钥密钥密钥"), "密钥密钥...密钥密钥");
    }

    #[test]
    fn test_complete_endpoint_host_port() {
        assert_eq!(
            complete_endpoint("http://localhost:11434", OPENAI_API_SUFFIX),
            "http://localhost:11434/v1/chat/completions"
        );
    }

    #[test]
    fn test_complete_endpoint_trailing_slash() {
        assert_eq!(
            complete_endpoint("http://localhost:11434/", OPENAI_API_SUFFIX),
            "http://localhost:11434/v1/chat/completions"
        );
    }

    #[test]
    fn test_complete_endpoint_already_complete() {
        assert_eq!(
            complete_endpoint("http://vllm:8000/v1/chat/completions", OPENAI_API_SUFFIX),
            "http://vllm:8000/v1/chat/completions"
        );
    }

    #[test]
    fn test_complete_endpoint_version_only() {
        assert_eq!(
            complete_endpoint("http://vllm:8000/v1", OPENAI_API_SUFFIX),
            "http://vllm:8000/v1/chat/completions"
        );
    }

    #[test]
    fn test_complete_endpoint_custom_path() {
        assert_eq!(
            complete_endpoint("https://proxy.internal/llm/openai", OPENAI_API_SUFFIX),
            "https://proxy.internal/llm/openai"
        );
    }

    #[test]
    fn test_complete_endpoint_suffix_without_slash() {
        assert_eq!(
            complete_endpoint("http://localhost:11434", "v1/chat/completions"),
            "http://localhost:11434/v1/chat/completions"
        );
    }

    #[test]
    fn test_is_complete_api_path() {
        assert!(is_complete_api_path("https://api.com/v1/chat"));
        assert!(!is_complete_api_path("http://localhost:11434"));
        assert!(!is_complete_api_path("http://localhost:11434/"));
        assert!(!is_complete_api_path("http://localhost:11434/v1"));
    }

    #[test]
    fn test_has_explicit_port() {
        assert!(has_explicit_port("http://localhost:11434"));
        assert!(has_explicit_port("localhost:11434"));
        assert!(has_explicit_port("https://example.com:443/v1"));
        assert!(!has_explicit_port("http://localhost"));
        assert!(!has_explicit_port("https://example.com/a:b"));
        assert!(!has_explicit_port("http://[::1]"));
        assert!(has_explicit_port("http://[::1]:11434"));
    }
}
