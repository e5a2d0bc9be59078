use gcop_server::*;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use tokio::runtime::Runtime;

fn main() -> Result<()> {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    // 根据 verbose 标志设置日志级别
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    // 初始化 tracing 日志（RUST_LOG 可进一步细化）
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()),
        )
        .init();

    // reqwest 使用 rustls-no-provider，需要手动安装 crypto provider
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        tracing::debug!("rustls crypto provider already installed");
    }

    // 加载并校验配置，失败则在绑定端口之前退出
    let mut config = config::load_config().context("Failed to load configuration")?;
    cli.apply_to(&mut config);
    config.validate().context("Invalid configuration")?;
    tracing::debug!("Effective configuration: {:?}", config);

    if cli.check_config {
        println!("Configuration OK");
        return Ok(());
    }

    let provider = llm::provider::create_provider(&config)?;

    let rt = Runtime::new()?;
    rt.block_on(server::serve(&config, provider))?;
    Ok(())
}
