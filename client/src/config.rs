//! Configuration for the async transfer client.

use std::env;
use std::time::Duration;

use crate::error::{ClientError, ClientResult};

/// Production API host.
pub const DEFAULT_BASE_URL: &str = "https://airporttransferportal.com";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Create configuration from environment variables
    ///
    /// Reads the following environment variables:
    /// - `TRANSFER_API_URL`: API host (defaults to the production host)
    /// - `TRANSFER_TIMEOUT_SECS`: Request timeout in seconds (defaults to 30)
    pub fn from_env() -> ClientResult<Self> {
        let base_url = env::var("TRANSFER_API_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = match env::var("TRANSFER_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map(Duration::from_secs)
                .map_err(|_| ClientError::config(format!("TRANSFER_TIMEOUT_SECS is not a number: {raw}")))?,
            Err(_) => DEFAULT_TIMEOUT,
        };

        let config = Self { base_url, timeout };
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn validate(&self) -> ClientResult<()> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(ClientError::config("base URL is empty"));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(url.to_string()));
        }
        if self.timeout.is_zero() {
            return Err(ClientError::config("timeout must be greater than zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_production() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builders_override_fields() {
        let config = ClientConfig::default()
            .with_base_url("http://127.0.0.1:3000")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.base_url, "http://127.0.0.1:3000");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let empty = ClientConfig::default().with_base_url("  ");
        assert!(matches!(empty.validate(), Err(ClientError::Config(_))));

        let scheme = ClientConfig::default().with_base_url("ftp://example.com");
        assert!(matches!(scheme.validate(), Err(ClientError::InvalidUrl(_))));

        let zero = ClientConfig::default().with_timeout(Duration::ZERO);
        assert!(matches!(zero.validate(), Err(ClientError::Config(_))));
    }
}
