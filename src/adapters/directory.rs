use crate::domain::model::DirectoryResultList;
use crate::domain::ports::{ConfigProvider, DirectoryConnector, DirectorySearch};
use crate::utils::error::{GatewayError, QueryFailure, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// The directory rejects result pages larger than this.
pub const DIRECTORY_MAX_RESULTS_LIMIT: u32 = 1000;
pub const DEFAULT_MAX_RESULTS_PER_QUERY: u32 = 100;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const SEARCH_PATH: &str = "search/1.0/xml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySettings {
    pub base_url: String,
    pub max_results_per_query: u32,
    pub request_timeout: Duration,
}

impl DirectorySettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            max_results_per_query: DEFAULT_MAX_RESULTS_PER_QUERY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            base_url: config.directory_base_url().to_string(),
            max_results_per_query: config.max_results_per_query(),
            request_timeout: config.request_timeout(),
        }
    }

    /// Page size actually sent, never above the directory limit.
    pub fn effective_max_results(&self) -> u32 {
        self.max_results_per_query
            .clamp(1, DIRECTORY_MAX_RESULTS_LIMIT)
    }

    pub fn search_url(&self) -> Result<Url> {
        let base = format!("{}/", self.base_url.trim_end_matches('/'));
        let base = Url::parse(&base).map_err(|e| GatewayError::InvalidConfigValueError {
            field: "directory.base_url".to_string(),
            value: self.base_url.clone(),
            reason: format!("Invalid URL format: {}", e),
        })?;
        base.join(SEARCH_PATH).map_err(|e| GatewayError::ConfigError {
            message: format!("Cannot build Directory search URL: {}", e),
        })
    }
}

/// Opens one HTTP session per lookup batch.
#[derive(Debug, Clone)]
pub struct HttpDirectoryConnector {
    settings: DirectorySettings,
}

impl HttpDirectoryConnector {
    pub fn new(settings: DirectorySettings) -> Self {
        Self { settings }
    }
}

impl DirectoryConnector for HttpDirectoryConnector {
    type Session = DirectoryClient;

    fn open(&self) -> Result<DirectoryClient> {
        let client = Client::builder()
            .timeout(self.settings.request_timeout)
            .build()?;
        Ok(DirectoryClient {
            client,
            search_url: self.settings.search_url()?,
            max_results: self.settings.effective_max_results(),
        })
    }
}

/// Directory search session. Dropping it releases the connection pool.
#[derive(Debug)]
pub struct DirectoryClient {
    client: Client,
    search_url: Url,
    max_results: u32,
}

impl DirectoryClient {
    pub fn query_url(&self, identifier: &str) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("rpc", &self.max_results.to_string())
            .append_pair("doctype", identifier);
        url
    }
}

impl Drop for DirectoryClient {
    fn drop(&mut self) {
        tracing::debug!("Closing Directory session for {}", self.search_url);
    }
}

#[async_trait]
impl DirectorySearch for DirectoryClient {
    async fn query(&self, identifier: &str) -> std::result::Result<DirectoryResultList, QueryFailure> {
        let url = self.query_url(identifier);
        tracing::debug!("Making Directory request to: {}", url);

        let response = self.client.get(url).send().await?;
        tracing::debug!("Directory response status: {}", response.status());

        if !response.status().is_success() {
            return Err(QueryFailure::Status {
                status: response.status().as_u16(),
            });
        }

        let payload = response.bytes().await?;
        parse_result_list(&payload)
    }
}

/// Parses a `<resultlist>` document of the directory search API.
pub fn parse_result_list(payload: &[u8]) -> std::result::Result<DirectoryResultList, QueryFailure> {
    let text = std::str::from_utf8(payload).map_err(|e| QueryFailure::Parse {
        message: e.to_string(),
    })?;
    if text.trim().is_empty() {
        return Err(QueryFailure::Parse {
            message: "empty payload".to_string(),
        });
    }
    quick_xml::de::from_str(text).map_err(|e| QueryFailure::Parse {
        message: e.to_string(),
    })
}
