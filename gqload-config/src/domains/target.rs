//! GraphQL endpoint configuration

use crate::error::ConfigResult;
use crate::validation::{validate_required_string, validate_url, Validatable};
use serde::{Deserialize, Serialize};

/// Where requests go and which static headers identify the storefront channel
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// GraphQL endpoint URL
    #[serde(default = "default_url")]
    pub url: String,

    /// Header carrying the channel token
    #[serde(default = "default_channel_header")]
    pub channel_header: String,

    /// Channel token sent on every request, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_token: Option<String>,

    /// Include `operationName` in the request body
    #[serde(default = "crate::domains::utils::default_false")]
    pub send_operation_name: bool,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            channel_header: default_channel_header(),
            channel_token: None,
            send_operation_name: false,
        }
    }
}

impl Validatable for TargetConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_url(&self.url, "url", self.domain_name())?;
        validate_required_string(&self.channel_header, "channel_header", self.domain_name())?;

        if let Some(ref token) = self.channel_token {
            validate_required_string(token, "channel_token", self.domain_name())?;
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "target"
    }
}

fn default_url() -> String {
    "http://localhost:3000/shop-api".to_string()
}

fn default_channel_header() -> String {
    "vendure-token".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_defaults() {
        let config = TargetConfig::default();
        assert_eq!(config.url, "http://localhost:3000/shop-api");
        assert_eq!(config.channel_header, "vendure-token");
        assert!(config.channel_token.is_none());
        assert!(!config.send_operation_name);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_target_validation() {
        let mut config = TargetConfig::default();
        config.url = "localhost".to_string();
        assert!(config.validate().is_err());

        config = TargetConfig::default();
        config.channel_token = Some(String::new());
        assert!(config.validate().is_err());
    }
}
