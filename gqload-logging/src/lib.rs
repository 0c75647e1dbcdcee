//! Structured logging setup for gqload
//!
//! Every crate in the workspace logs through `tracing`; this crate installs the
//! global subscriber once, driven by [`LoggingConfig`] or a bare level string.

pub mod init;

pub use gqload_config::{LogFormat, LogLevel, LoggingConfig};
pub use init::{build_env_filter, init_logging_from_config, init_simple_tracing};
