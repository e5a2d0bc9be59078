//! # gcop-server
//!
//! 基于本地 LLM 的 commit message 生成服务。
//!
//! 客户端（编辑器插件、git hook）把 diff 和上下文 POST 过来，服务构建 prompt、
//! 调用 OpenAI 兼容的 chat completions 接口（默认 Ollama），
//! 再把回复清洗成一行 Conventional Commits 标题返回。
//!
//! ## 功能
//! - **Prompt 构建**：分支名中的 ticket、变更文件列表、已有 message 草稿、超长 diff 截断
//! - **回复清洗**：去引号、去代码块、只保留第一行，空回复使用兜底 message
//! - **鉴权**：`Authorization: Bearer <API_SECRET_KEY>`
//! - **限流**：按客户端 IP 的固定窗口，例如 `10/minute`
//!
//! ## 快速开始
//!
//! ### 作为服务使用
//! ```bash
//! API_SECRET_KEY=change-me OLLAMA_MODEL=llama3 gcop-server --port 8000
//!
//! curl -s http://localhost:8000/generate_commit_message \
//!   -H 'Authorization: Bearer change-me' \
//!   -H 'Content-Type: application/json' \
//!   -d '{"diff_text":"...","branch_name":"main","changed_files":[],"author_name":"me","existing_message":""}'
//! ```
//!
//! ### 作为库使用
//! ```ignore
//! use gcop_server::config::AppConfig;
//! use gcop_server::llm::{self, CommitContext};
//! use gcop_server::llm::provider::create_provider;
//!
//! # async fn example() -> gcop_server::error::Result<()> {
//! let config = AppConfig::default();
//! let provider = create_provider(&config)?;
//!
//! let context = CommitContext {
//!     diff_text: "diff --git a/src/lib.rs b/src/lib.rs\n...".to_string(),
//!     branch_name: "feature/ABC-42-login".to_string(),
//!     ..Default::default()
//! };
//! let message = llm::generate_commit_message(provider.as_ref(), &context).await?;
//! println!("Generated: {}", message);
//! # Ok(())
//! # }
//! ```
//!
//! ## 模块
//! - [`config`]: 分层配置加载与校验
//! - [`llm`]: Provider trait、prompt 构建、回复清洗
//! - [`server`]: HTTP 路由、鉴权、限流
//! - [`error`]: 统一错误类型

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod llm;
pub mod server;
