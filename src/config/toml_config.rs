use crate::adapters::directory::{
    DEFAULT_MAX_RESULTS_PER_QUERY, DEFAULT_REQUEST_TIMEOUT, DIRECTORY_MAX_RESULTS_LIMIT,
};
use crate::core::aggregator::{FanOutSettings, DEFAULT_MAX_CONCURRENT_QUERIES};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{GatewayError, Result};
use crate::utils::validation::{
    validate_bind_address, validate_positive_number, validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub global: GlobalConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub directory: DirectoryConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub production: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default)]
    pub base_url: String,
    pub max_results_per_query: Option<u32>,
    pub max_concurrent_queries: Option<usize>,
    pub request_timeout_seconds: Option<u64>,
    pub lookup_deadline_seconds: Option<u64>,
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

impl GatewayConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GatewayError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| GatewayError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DIRECTORY_BASE_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| GatewayError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn fan_out_settings(&self) -> FanOutSettings {
        FanOutSettings {
            max_concurrent_queries: self.max_concurrent_queries(),
            deadline: self.lookup_deadline(),
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.global.debug
    }
}

impl ConfigProvider for GatewayConfig {
    fn directory_base_url(&self) -> &str {
        &self.directory.base_url
    }

    fn max_results_per_query(&self) -> u32 {
        self.directory
            .max_results_per_query
            .unwrap_or(DEFAULT_MAX_RESULTS_PER_QUERY)
    }

    fn max_concurrent_queries(&self) -> usize {
        self.directory
            .max_concurrent_queries
            .unwrap_or(DEFAULT_MAX_CONCURRENT_QUERIES)
    }

    fn request_timeout(&self) -> Duration {
        self.directory
            .request_timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT)
    }

    fn lookup_deadline(&self) -> Option<Duration> {
        self.directory.lookup_deadline_seconds.map(Duration::from_secs)
    }
}

impl Validate for GatewayConfig {
    fn validate(&self) -> Result<()> {
        if self.directory.base_url.trim().is_empty() {
            return Err(GatewayError::ConfigError {
                message: "The Directory base URL configuration is missing".to_string(),
            });
        }
        validate_url("directory.base_url", &self.directory.base_url)?;
        validate_bind_address("server.bind_address", &self.server.bind_address)?;

        validate_range(
            "directory.max_results_per_query",
            self.max_results_per_query(),
            1,
            DIRECTORY_MAX_RESULTS_LIMIT,
        )?;
        validate_positive_number(
            "directory.max_concurrent_queries",
            self.max_concurrent_queries(),
            1,
        )?;
        if let Some(timeout) = self.directory.request_timeout_seconds {
            validate_positive_number("directory.request_timeout_seconds", timeout as usize, 1)?;
        }
        if let Some(deadline) = self.directory.lookup_deadline_seconds {
            validate_positive_number("directory.lookup_deadline_seconds", deadline as usize, 1)?;
        }

        Ok(())
    }
}
