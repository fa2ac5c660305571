use axum::http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{message}")]
    InvalidRequest { message: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },

    #[error("HTTP client error: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl GatewayError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    /// HTTP 狀態碼：只有輸入驗證錯誤屬於客戶端錯誤
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// 回傳給呼叫端的訊息，伺服器錯誤不洩漏內部細節
    pub fn user_friendly_message(&self) -> String {
        match self {
            GatewayError::InvalidRequest { message } => message.clone(),
            _ => "Internal error while processing the request".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Failure of a single directory query. Recovered by the aggregator, never surfaced to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryFailure {
    #[error("directory request failed: {message}")]
    Transport { message: String },

    #[error("directory answered with HTTP status {status}")]
    Status { status: u16 },

    #[error("failed to parse directory result as XML: {message}")]
    Parse { message: String },

    #[error("directory client is misconfigured: {message}")]
    Configuration { message: String },

    #[error("lookup deadline exceeded")]
    DeadlineExceeded,
}

impl QueryFailure {
    /// Fatal failures would repeat for every identifier of the batch.
    pub fn is_fatal(&self) -> bool {
        matches!(self, QueryFailure::Configuration { .. })
    }

    pub fn stage(&self) -> &'static str {
        match self {
            QueryFailure::Transport { .. } | QueryFailure::Status { .. } => "request",
            QueryFailure::Parse { .. } => "parse",
            QueryFailure::Configuration { .. } => "setup",
            QueryFailure::DeadlineExceeded => "deadline",
        }
    }
}

impl From<reqwest::Error> for QueryFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            QueryFailure::Configuration {
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            QueryFailure::Status {
                status: status.as_u16(),
            }
        } else {
            QueryFailure::Transport {
                message: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let err = GatewayError::invalid_request("No Canonical Object Type ID was passed");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.is_client_error());
        assert_eq!(
            err.user_friendly_message(),
            "No Canonical Object Type ID was passed"
        );

        let err = GatewayError::internal("Failed to serialize XML response");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.user_friendly_message().contains("XML"));
    }

    #[test]
    fn test_only_configuration_failures_are_fatal() {
        assert!(QueryFailure::Configuration {
            message: "bad".into()
        }
        .is_fatal());
        assert!(!QueryFailure::Status { status: 500 }.is_fatal());
        assert!(!QueryFailure::DeadlineExceeded.is_fatal());
        assert_eq!(
            QueryFailure::Parse {
                message: "eof".into()
            }
            .stage(),
            "parse"
        );
    }
}
