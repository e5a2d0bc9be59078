mod app;
mod llm;
mod network;
mod server;

pub use app::AppConfig;
pub use llm::LLMConfig;
pub use network::NetworkConfig;
pub use server::ServerConfig;
