//! Domain-specific configuration modules

pub mod credentials;
pub mod http;
pub mod load;
pub mod logging;
pub mod pools;
pub mod target;
pub mod utils;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main gqload configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GqloadConfig {
    /// GraphQL endpoint and channel headers
    #[serde(default)]
    pub target: target::TargetConfig,

    /// Bearer token pool
    #[serde(default)]
    pub credentials: credentials::CredentialsConfig,

    /// Collection and product id pools
    #[serde(default)]
    pub pools: pools::PoolsConfig,

    /// HTTP client configuration
    #[serde(default)]
    pub http: http::HttpConfig,

    /// Load shape and thresholds
    #[serde(default)]
    pub load: load::LoadConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,
}

impl GqloadConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.target.validate()?;
        self.credentials.validate()?;
        self.pools.validate()?;
        self.http.validate()?;
        self.load.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Read the token and id files referenced by the config into the inline pools
    pub fn load_data_files(&mut self, base_dir: Option<&Path>) -> ConfigResult<()> {
        self.credentials.load_files(base_dir)?;
        self.pools.load_files(base_dir)?;
        Ok(())
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let config = GqloadConfig::default();
        serde_yaml::to_string(&config)
            .unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}
