use clap::Parser;
use ial_gateway::app::build_router;
use ial_gateway::core::ConfigProvider;
use ial_gateway::utils::{logger, validation::Validate};
use ial_gateway::CliConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    // 初始化日誌
    logger::init_logger(config.global.production, config.is_verbose());

    tracing::info!("Starting ial-gateway");
    if config.is_verbose() {
        tracing::debug!("Effective config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
    tracing::info!(
        "Using '{}' as the Directory base URL",
        config.directory_base_url()
    );

    let app = build_router(&config);
    let listener = tokio::net::TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!("🚀 Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("ial-gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
