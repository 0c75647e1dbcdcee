//! HTTP configuration

use crate::errors::HttpError;
use gqload_config::HttpConfig as ConfigHttpConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Connect timeout
    pub connect_timeout: Duration,

    /// User agent string
    pub user_agent: String,

    /// Whether to verify SSL certificates
    pub verify_ssl: bool,

    /// Idle connections kept per host
    pub pool_max_idle_per_host: usize,

    /// How long an idle connection is kept
    pub pool_idle_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        ConfigHttpConfig::default().into()
    }
}

impl From<ConfigHttpConfig> for HttpConfig {
    fn from(config: ConfigHttpConfig) -> Self {
        Self {
            timeout: config.timeout,
            connect_timeout: config.connection_pool.connection_timeout,
            user_agent: config.user_agent,
            verify_ssl: config.verify_ssl,
            pool_max_idle_per_host: config.connection_pool.max_idle_per_host,
            pool_idle_timeout: config.connection_pool.idle_timeout,
        }
    }
}

impl HttpConfig {
    /// Build the client shared by every virtual user.
    pub fn build_client(&self) -> Result<reqwest::Client, HttpError> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .pool_max_idle_per_host(self.pool_max_idle_per_host)
            .pool_idle_timeout(self.pool_idle_timeout)
            .user_agent(&self.user_agent)
            .danger_accept_invalid_certs(!self.verify_ssl)
            .build()?;
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_domain() {
        let mut domain = ConfigHttpConfig::default();
        domain.timeout = Duration::from_secs(5);
        domain.user_agent = "load-test".to_string();
        domain.connection_pool.max_idle_per_host = 7;

        let config = HttpConfig::from(domain);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "load-test");
        assert_eq!(config.pool_max_idle_per_host, 7);
        assert!(config.verify_ssl);
        assert!(config.build_client().is_ok());
    }
}
