mod cli;

use anyhow::Result;
use clap::Parser;

use logship_core::config::LogshipConfig;
use logship_daemon::logging;
use logship_daemon::orchestrator::Orchestrator;

use crate::cli::DaemonCli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = DaemonCli::parse();

    // 설정 로드 (파일 + 환경변수)
    let mut config = match cli.config.as_deref() {
        Some(path) => LogshipConfig::load(path).await,
        None => LogshipConfig::from_env(),
    }
    .map_err(|e| anyhow::anyhow!("failed to load config: {}", e))?;

    // CLI 오버라이드가 최우선
    if let Some(level) = cli.log_level {
        config.general.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.general.log_format = format;
    }
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("config validation failed: {}", e))?;

    if cli.validate {
        println!("configuration is valid");
        return Ok(());
    }

    logging::init_tracing(&config.general)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "logship-daemon starting");

    let mut orchestrator = Orchestrator::build_from_config(config).await?;
    orchestrator.run().await?;

    tracing::info!("logship-daemon shut down");
    Ok(())
}
