//! 配置模块
//!
//! 分层加载（默认值 → 配置文件 → 环境变量），启动时校验一次，
//! 之后以只读方式传入请求路径。

mod loader;
mod structs;

pub use loader::{CONFIG_PATH_ENV, get_config_dir, get_config_path, load_config, load_config_from};
pub use structs::{AppConfig, LLMConfig, NetworkConfig, ServerConfig};
