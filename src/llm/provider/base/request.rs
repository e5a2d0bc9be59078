//! HTTP 请求发送
//!
//! 单次发送 LLM API 请求：网络错误、非 2xx 状态码、无法解析的响应体
//! 统一归类为 `GcopError::BackendUnavailable`。本层不做重试。

use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::response::truncate_for_preview;
use crate::error::{BackendFailure, GcopError, Result};

/// 把 reqwest 错误分类为 [`BackendFailure`]
fn classify_transport_error(e: reqwest::Error) -> BackendFailure {
    if e.is_timeout() {
        BackendFailure::Timeout(e.to_string())
    } else if e.is_connect() {
        BackendFailure::Connect(e.to_string())
    } else {
        BackendFailure::Transport(e)
    }
}

fn error_type(failure: &BackendFailure) -> &'static str {
    match failure {
        BackendFailure::Timeout(_) => "timeout",
        BackendFailure::Connect(_) => "connection failed",
        BackendFailure::Transport(e) if e.is_body() => "body error",
        BackendFailure::Transport(e) if e.is_decode() => "decode error",
        BackendFailure::Transport(e) if e.is_request() => "request error",
        BackendFailure::Transport(_) => "unknown",
        BackendFailure::Status { .. } => "status",
        BackendFailure::Malformed(_) => "malformed",
    }
}

/// 尝试发送一次 HTTP 请求（只处理网络层错误）
async fn try_send_request<Req: Serialize>(
    client: &Client,
    endpoint: &str,
    headers: &[(&str, &str)],
    request_body: &Req,
    provider_name: &str,
) -> Result<reqwest::Response> {
    let mut req = client
        .post(endpoint)
        .header("Content-Type", "application/json");

    for (key, value) in headers {
        req = req.header(*key, *value);
    }

    tracing::debug!("Sending request to: {}", endpoint);

    req.json(request_body).send().await.map_err(|e| {
        let failure = classify_transport_error(e);
        tracing::debug!(
            "{} API request failed [{}]: {}",
            provider_name,
            error_type(&failure),
            failure
        );
        GcopError::backend(provider_name, failure)
    })
}

/// 发送 LLM API 请求的通用函数（单次，不重试）
///
/// # Arguments
/// * `client` - HTTP 客户端（超时在 client 上配置）
/// * `endpoint` - API 端点
/// * `headers` - 额外的请求头
/// * `request_body` - 请求体
/// * `provider_name` - Provider 名称（用于日志和错误信息）
pub async fn send_llm_request<Req, Resp>(
    client: &Client,
    endpoint: &str,
    headers: &[(&str, &str)],
    request_body: &Req,
    provider_name: &str,
) -> Result<Resp>
where
    Req: Serialize,
    Resp: DeserializeOwned,
{
    let response =
        try_send_request(client, endpoint, headers, request_body, provider_name).await?;
    let status = response.status();

    // 读取响应 body
    let response_text = response
        .text()
        .await
        .map_err(|e| GcopError::backend(provider_name, classify_transport_error(e)))?;

    tracing::debug!("{} API response status: {}", provider_name, status);
    tracing::debug!("{} API response body: {}", provider_name, response_text);

    if !status.is_success() {
        return Err(GcopError::backend(
            provider_name,
            BackendFailure::Status {
                status: status.as_u16(),
                body: truncate_for_preview(&response_text),
            },
        ));
    }

    serde_json::from_str(&response_text).map_err(|e| {
        GcopError::backend(
            provider_name,
            BackendFailure::Malformed(format!(
                "{}. Raw response: {}",
                e,
                truncate_for_preview(&response_text)
            )),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::provider::test_utils::ensure_crypto_provider;
    use mockito::Server;
    use serde::Deserialize;

    #[derive(Serialize)]
    struct Ping {
        ping: bool,
    }

    #[derive(Debug, Deserialize)]
    struct Pong {
        pong: String,
    }

    fn client() -> Client {
        Client::builder()
            .timeout(std::time::Duration::from_secs(5))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_send_success_parses_json() {
        ensure_crypto_provider();
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/x")
            .match_header("authorization", "Bearer k")
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_body(r#"{"pong":"ok"}"#)
            .create_async()
            .await;

        let url = format!("{}/x", server.url());
        let pong: Pong = send_llm_request(
            &client(),
            &url,
            &[("Authorization", "Bearer k")],
            &Ping { ping: true },
            "test",
        )
        .await
        .unwrap();
        assert_eq!(pong.pong, "ok");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_non_success_status() {
        ensure_crypto_provider();
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/x")
            .with_status(500)
            .with_body("model not loaded")
            .expect(1)
            .create_async()
            .await;

        let url = format!("{}/x", server.url());
        let err = send_llm_request::<_, Pong>(&client(), &url, &[], &Ping { ping: true }, "test")
            .await
            .unwrap_err();

        match err {
            GcopError::BackendUnavailable {
                cause: BackendFailure::Status { status, body },
                ..
            } => {
                assert_eq!(status, 500);
                assert_eq!(body, "model not loaded");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        // 不重试
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_malformed_body() {
        ensure_crypto_provider();
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/x")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let url = format!("{}/x", server.url());
        let err = send_llm_request::<_, Pong>(&client(), &url, &[], &Ping { ping: true }, "test")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            GcopError::BackendUnavailable {
                cause: BackendFailure::Malformed(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_send_connection_refused() {
        ensure_crypto_provider();
        // 端口 9 (discard) 在测试环境中通常没有监听
        let err = send_llm_request::<_, Pong>(
            &client(),
            "http://127.0.0.1:9/v1/chat/completions",
            &[],
            &Ping { ping: true },
            "test",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, GcopError::BackendUnavailable { .. }));
    }
}
