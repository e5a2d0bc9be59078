//! HTTP layer: routing, auth, rate limiting, and error mapping.
//!
//! Everything request-scoped lives here; the commit pipeline in
//! [`crate::llm`] never sees HTTP types.

pub mod auth;
pub mod handlers;
pub mod payload;
pub mod rate_limit;
mod response;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::Router;
use axum::extract::{ConnectInfo, DefaultBodyLimit, Request, State};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::error::Result;
use crate::llm::LLMProvider;
use rate_limit::{RateLimit, RateLimiter};

/// Shared, read-only state handed to every handler.
///
/// The rate limiter is the only part with interior mutability.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn LLMProvider>,
    pub api_secret_key: Arc<str>,
    pub limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(provider: Arc<dyn LLMProvider>, api_secret_key: &str, limit: RateLimit) -> Self {
        Self {
            provider,
            api_secret_key: Arc::from(api_secret_key),
            limiter: Arc::new(RateLimiter::new(limit)),
        }
    }

    /// State from validated configuration.
    pub fn from_config(config: &AppConfig, provider: Arc<dyn LLMProvider>) -> Result<Self> {
        Ok(Self::new(
            provider,
            config.server.api_secret()?,
            config.server.parsed_rate_limit()?,
        ))
    }
}

/// Builds the application router.
///
/// Rate limiting wraps every route, including unknown ones. There is no body
/// size cap: oversized diffs are truncated by the prompt builder instead.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route(
            "/generate_commit_message",
            post(handlers::generate_commit_message),
        )
        .layer(DefaultBodyLimit::disable())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .with_state(state)
}

async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_ip(&request);
    if let Err(err) = state.limiter.check(client).await {
        return err.into_response();
    }
    next.run(request).await
}

/// Peer address of the connection; loopback when unknown (in-process tests).
fn client_ip(request: &Request) -> IpAddr {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

/// Binds the listener and serves until Ctrl-C or SIGTERM.
pub async fn serve(config: &AppConfig, provider: Arc<dyn LLMProvider>) -> Result<()> {
    let state = AppState::from_config(config, provider)?;
    let limit = *state.limiter.limit();
    let app = build_router(state);

    let listener = TcpListener::bind(config.server.bind_address()).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);
    tracing::info!("Rate limit: {} per client", limit);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received, draining connections");
}
