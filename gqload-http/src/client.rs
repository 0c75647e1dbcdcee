//! GraphQL request executor

use crate::config::HttpConfig;
use crate::credentials::CredentialResolver;
use crate::errors::HttpError;
use crate::metrics::FailureRate;
use crate::types::{ExecutionResult, GraphqlRequest};
use gqload_config::GqloadConfig;
use rand::RngCore;
use reqwest::Client;
use serde_json::Value as JsonValue;
use std::time::Instant;
use tracing::{debug, warn};

/// Per-call options
#[derive(Debug, Clone, Copy)]
pub struct QueryOptions<'a> {
    /// Accumulator receiving this call's status check
    pub failure_rate: &'a FailureRate,
}

impl<'a> QueryOptions<'a> {
    pub fn new(failure_rate: &'a FailureRate) -> Self {
        Self { failure_rate }
    }
}

/// Client trait for posting GraphQL operations.
///
/// Every call to [`GraphqlClient::execute`] records exactly one sample into
/// `options.failure_rate`: a failure unless the response status is 200.
#[async_trait::async_trait]
pub trait GraphqlClient: Send + Sync {
    async fn execute(
        &self,
        operation: &str,
        query: &str,
        variables: JsonValue,
        rng: &mut (dyn RngCore + Send),
        options: &QueryOptions<'_>,
    ) -> Result<ExecutionResult, HttpError>;

    /// Post an operation and return its `data` object.
    ///
    /// `Ok(None)` means the response had no data: transport failure, empty
    /// body, or a body carrying only `errors`. `Err` means the body was not
    /// valid JSON.
    async fn post_query(
        &self,
        operation: &str,
        query: &str,
        variables: JsonValue,
        rng: &mut (dyn RngCore + Send),
        options: &QueryOptions<'_>,
    ) -> Result<Option<JsonValue>, HttpError> {
        let result = self.execute(operation, query, variables, rng, options).await?;
        Ok(take_data(result))
    }
}

/// Consume a result into its `data`, logging the full body when it has none
pub fn take_data(result: ExecutionResult) -> Option<JsonValue> {
    if result.data().is_none() {
        if let Some(body) = &result.body {
            warn!(
                operation = %result.operation,
                status = ?result.status,
                body = %body,
                "Response carried no data"
            );
        }
    }
    result.into_data()
}

/// reqwest-backed executor shared by every virtual user
#[derive(Debug, Clone)]
pub struct GraphqlExecutor {
    client: Client,
    resolver: CredentialResolver,
    send_operation_name: bool,
}

impl GraphqlExecutor {
    pub fn new(client: Client, resolver: CredentialResolver) -> Self {
        Self {
            client,
            resolver,
            send_operation_name: false,
        }
    }

    /// Build an executor from the loaded configuration
    pub fn from_config(config: &GqloadConfig) -> Result<Self, HttpError> {
        let http = HttpConfig::from(config.http.clone());
        debug!(
            "Creating GraphqlExecutor for {} with timeout: {}s",
            config.target.url,
            http.timeout.as_secs()
        );
        let client = http.build_client()?;
        let resolver = CredentialResolver::from_config(&config.target, &config.credentials)?;
        Ok(Self::new(client, resolver).with_operation_name(config.target.send_operation_name))
    }

    pub fn with_operation_name(mut self, send: bool) -> Self {
        self.send_operation_name = send;
        self
    }

    pub fn resolver(&self) -> &CredentialResolver {
        &self.resolver
    }

    fn build_request(&self, operation: &str, query: &str, variables: JsonValue) -> GraphqlRequest {
        let request = GraphqlRequest::new(query, variables);
        if self.send_operation_name {
            request.with_operation_name(operation)
        } else {
            request
        }
    }
}

#[async_trait::async_trait]
impl GraphqlClient for GraphqlExecutor {
    async fn execute(
        &self,
        operation: &str,
        query: &str,
        variables: JsonValue,
        rng: &mut (dyn RngCore + Send),
        options: &QueryOptions<'_>,
    ) -> Result<ExecutionResult, HttpError> {
        let target = self.resolver.resolve(rng);
        let request = self.build_request(operation, query, variables);

        debug!(operation, url = %target.url, "Sending GraphQL request");
        let started = Instant::now();

        let response = match self
            .client
            .post(target.url)
            .headers(target.headers)
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                options.failure_rate.add(true);
                warn!(operation, error = %e, "GraphQL request failed");
                return Ok(ExecutionResult {
                    operation: operation.to_string(),
                    status: None,
                    body: None,
                    elapsed: started.elapsed(),
                });
            }
        };

        let status = response.status().as_u16();
        options.failure_rate.add(status != 200);
        if status != 200 {
            warn!(operation, status, "GraphQL request returned non-200 status");
        }

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(operation, status, error = %e, "Failed to read response body");
                return Ok(ExecutionResult {
                    operation: operation.to_string(),
                    status: Some(status),
                    body: None,
                    elapsed: started.elapsed(),
                });
            }
        };
        let elapsed = started.elapsed();
        debug!(operation, status, elapsed_ms = elapsed.as_millis() as u64, "Received response");

        let body = if bytes.iter().all(u8::is_ascii_whitespace) {
            None
        } else {
            Some(serde_json::from_slice(&bytes)?)
        };

        Ok(ExecutionResult {
            operation: operation.to_string(),
            status: Some(status),
            body,
            elapsed,
        })
    }
}
