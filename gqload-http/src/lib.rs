//! GraphQL-over-HTTP execution for gqload
//!
//! This crate posts GraphQL operations with a rotating bearer credential and
//! records one pass/fail check per request into a shared [`FailureRate`].

pub mod client;
pub mod config;
pub mod credentials;
pub mod errors;
pub mod metrics;
pub mod types;

// Re-export main types for convenience
pub use client::{take_data, GraphqlClient, GraphqlExecutor, QueryOptions};
pub use config::HttpConfig;
pub use credentials::{CredentialResolver, RequestTarget};
pub use errors::HttpError;
pub use metrics::{FailureRate, RateSnapshot};
pub use types::{ExecutionResult, GraphqlRequest};
