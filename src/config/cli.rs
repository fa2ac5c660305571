use crate::config::toml_config::GatewayConfig;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "ial-gateway")]
#[command(about = "Routing information lookup gateway backed by a participant directory")]
pub struct CliConfig {
    #[arg(long, short = 'c', help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Overrides directory.base_url")]
    pub directory_base_url: Option<String>,

    #[arg(long, help = "Overrides server.bind_address")]
    pub bind: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 讀取設定檔，再以命令列參數覆寫
    pub fn resolve(&self) -> Result<GatewayConfig> {
        let mut config = match &self.config {
            Some(path) => GatewayConfig::from_file(path)?,
            None => GatewayConfig::default(),
        };

        if let Some(url) = &self.directory_base_url {
            config.directory.base_url = url.clone();
        }
        if let Some(bind) = &self.bind {
            config.server.bind_address = bind.clone();
        }
        if self.verbose {
            config.global.debug = true;
        }
        Ok(config)
    }
}
