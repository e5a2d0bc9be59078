use clap::{Parser, builder::styling};

const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::Green.on_default().bold())
    .usage(styling::AnsiColor::Green.on_default().bold())
    .literal(styling::AnsiColor::Cyan.on_default().bold())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// Commit message generation service backed by a local LLM
#[derive(Parser, Debug)]
#[command(name = "gcop-server")]
#[command(author, version, long_about = None)]
#[command(styles = STYLES)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Bind address (overrides [server] host)
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port (overrides [server] port)
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Validate configuration and exit
    #[arg(long)]
    pub check_config: bool,
}

impl Cli {
    /// Applies listener overrides to loaded configuration.
    pub fn apply_to(&self, config: &mut crate::config::AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}
