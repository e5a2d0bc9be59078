//! 全局常量定义

/// LLM 相关常量
pub mod llm {
    /// 默认 max_tokens：足够一行 subject，不够写长篇
    pub const DEFAULT_MAX_TOKENS: u32 = 75;

    /// 默认 temperature
    pub const DEFAULT_TEMPERATURE: f32 = 0.5;

    /// 默认模型
    pub const DEFAULT_MODEL: &str = "llama3";

    /// Ollama 不校验 key，但 OpenAI 兼容协议要求带上
    pub const DEFAULT_API_KEY: &str = "ollama";
}

/// Prompt 相关常量
pub mod prompt {
    /// diff 最大字符数（按字符计，不是 token）
    pub const MAX_DIFF_CHARS: usize = 15_000;

    /// 超长 diff 的截断标记
    pub const TRUNCATION_MARKER: &str = "... [TRUNCATED]";

    /// 最多列出的文件数
    pub const MAX_LISTED_FILES: usize = 10;

    /// merge 提示中引用 existing message 的最大字符数
    pub const MERGE_NOTE_PREVIEW_CHARS: usize = 50;
}

/// Commit 相关常量
pub mod commit {
    /// 模型返回空内容时的兜底 message
    pub const FALLBACK_MESSAGE: &str = "chore: Automatic generation failed";
}

/// Server 相关常量
pub mod server {
    /// 默认监听地址
    pub const DEFAULT_HOST: &str = "0.0.0.0";

    /// 默认监听端口
    pub const DEFAULT_PORT: u16 = 8000;

    /// 默认限流表达式
    pub const DEFAULT_RATE_LIMIT: &str = "10/minute";

    /// 日志中 commit message 预览长度
    pub const LOG_PREVIEW_CHARS: usize = 100;
}
