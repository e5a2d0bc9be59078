// 配置加载逻辑
//
// 此文件负责从文件、GCOP_SERVER__* 环境变量和部署环境变量加载配置。

use config::{Config, Environment, File};
use directories::ProjectDirs;
use std::env;
use std::path::{Path, PathBuf};

use super::structs::AppConfig;
use crate::error::{GcopError, Result};

/// 显式指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "GCOP_SERVER_CONFIG";

/// 加载应用配置
///
/// 配置加载优先级（从高到低）：
/// 1. 部署环境变量（`API_SECRET_KEY`、`RATE_LIMIT`、`LLM_BASE_URL`、
///    `LLM_BASE_PORT`、`OLLAMA_MODEL`、`LLM_API_KEY`、`REQUEST_TIMEOUT`）
/// 2. `GCOP_SERVER__*` 环境变量（双下划线表示嵌套）
///    - 例如：`GCOP_SERVER__LLM__MODEL=qwen2.5-coder`
/// 3. 配置文件（`GCOP_SERVER_CONFIG` 或 ~/.config/gcop-server/config.toml）
/// 4. 默认值（structs 中的 Default 和 serde(default)）
///
/// 返回的配置尚未校验，调用方需要执行 [`AppConfig::validate`]。
pub fn load_config() -> Result<AppConfig> {
    let path = resolve_config_path()?;
    load_config_from(path.as_deref())
}

/// 从指定配置文件加载（`None` 表示不读文件）
pub fn load_config_from(config_path: Option<&Path>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    // 1. 配置文件
    if let Some(path) = config_path {
        tracing::debug!("Loading config file: {}", path.display());
        builder = builder.add_source(File::from(path));
    }

    // 2. GCOP_SERVER__* 环境变量
    // 例如：GCOP_SERVER__SERVER__RATE_LIMIT -> server.rate_limit
    builder = builder.add_source(
        Environment::with_prefix("GCOP_SERVER")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let mut app_config: AppConfig = config.try_deserialize()?;

    // 3. 部署环境变量（优先级最高）
    apply_env_overrides(&mut app_config)?;

    Ok(app_config)
}

/// 应用部署环境变量覆盖
///
/// 这些变量名是容器部署中已经在用的约定，不带前缀。
/// 空值视为未设置。
fn apply_env_overrides(config: &mut AppConfig) -> Result<()> {
    if let Some(secret) = env_value("API_SECRET_KEY") {
        config.server.api_secret_key = Some(secret);
    }
    if let Some(limit) = env_value("RATE_LIMIT") {
        config.server.rate_limit = limit;
    }
    if let Some(base_url) = env_value("LLM_BASE_URL") {
        config.llm.base_url = base_url;
    }
    if let Some(port) = env_value("LLM_BASE_PORT") {
        config.llm.port = port.parse().map_err(|_| {
            GcopError::Config(format!("LLM_BASE_PORT '{}' is not a valid port", port))
        })?;
    }
    if let Some(model) = env_value("OLLAMA_MODEL") {
        config.llm.model = model;
    }
    if let Some(api_key) = env_value("LLM_API_KEY") {
        config.llm.api_key = Some(api_key);
    }
    if let Some(timeout) = env_value("REQUEST_TIMEOUT") {
        config.network.request_timeout = timeout.parse().map_err(|_| {
            GcopError::Config(format!(
                "REQUEST_TIMEOUT '{}' is not a whole number of seconds",
                timeout
            ))
        })?;
    }
    Ok(())
}

fn env_value(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 决定要读取的配置文件
///
/// - 设置了 `GCOP_SERVER_CONFIG`：文件必须存在
/// - 否则使用平台配置目录下的 config.toml（不存在则跳过）
fn resolve_config_path() -> Result<Option<PathBuf>> {
    if let Some(explicit) = env_value(CONFIG_PATH_ENV) {
        let path = PathBuf::from(explicit);
        if !path.is_file() {
            return Err(GcopError::Config(format!(
                "{} points to '{}', which is not a file",
                CONFIG_PATH_ENV,
                path.display()
            )));
        }
        return Ok(Some(path));
    }
    Ok(get_config_path().filter(|p| p.exists()))
}

/// 获取默认配置文件路径
///
/// 返回 ~/.config/gcop-server/config.toml
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("config.toml"))
}

/// 获取配置目录路径
pub fn get_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "gcop-server").map(|dirs| dirs.config_dir().to_path_buf())
}
