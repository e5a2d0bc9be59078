//! Provider 公共抽象和辅助函数
//!
//! 模块结构：
//! - `config` - 采样参数与端点的解析
//! - `request` - 单次 HTTP 请求发送与错误归类
//! - `response` - completion 清理（commit subject 规范化）

pub mod config;
pub mod request;
pub mod response;

pub use config::*;
pub use request::send_llm_request;
pub use response::*;
