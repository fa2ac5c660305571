use crate::utils::error::{GatewayError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.trim().is_empty() {
        return Err(GatewayError::MissingConfigError {
            field: field_name.to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(GatewayError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(GatewayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// Accepts anything `TcpListener::bind` resolves: an IP socket address or `host:port`.
pub fn validate_bind_address(field_name: &str, address: &str) -> Result<()> {
    if address.parse::<std::net::SocketAddr>().is_ok() {
        return Ok(());
    }

    let invalid = |reason: &str| GatewayError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: address.to_string(),
        reason: reason.to_string(),
    };

    let (host, port) = address
        .rsplit_once(':')
        .ok_or_else(|| invalid("Expected host:port"))?;
    if host.trim().is_empty() || host.contains(char::is_whitespace) {
        return Err(invalid("Host must not be empty"));
    }
    // 未加中括號的 IPv6 位址無法與埠號區分
    if host.contains(':') && !(host.starts_with('[') && host.ends_with(']')) {
        return Err(invalid("IPv6 addresses must be enclosed in brackets"));
    }
    port.parse::<u16>()
        .map(|_| ())
        .map_err(|e| invalid(&format!("Invalid port: {}", e)))
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(GatewayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(GatewayError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}
