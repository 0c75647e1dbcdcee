//! Domain-driven configuration management for gqload
//!
//! Configuration is split by functional domain (target endpoint, credentials,
//! parameter pools, HTTP client, load shape, logging), each with its own
//! defaults and validation, plus `GQLOAD_*` environment overrides.

pub mod error;
pub mod loader;
pub mod validation;

// Domain-specific configuration modules
pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

// Re-export domain configurations
pub use domains::{
    credentials::CredentialsConfig,
    http::HttpConfig,
    load::{LoadConfig, StageConfig, ThresholdConfig, CHECK_FAILURE_RATE, HTTP_REQ_DURATION},
    logging::{LogFormat, LogLevel, LoggingConfig},
    pools::PoolsConfig,
    target::TargetConfig,
    GqloadConfig,
};

// Re-export utilities
pub use domains::utils::serde_duration;
