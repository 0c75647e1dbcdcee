//! Per-virtual-user execution context

use crate::error::ScenarioResult;
use crate::pools::{pick, ParameterPools};
use crate::registry::OperationRegistry;
use gqload_http::{take_data, FailureRate, GraphqlClient, QueryOptions};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Latency and check outcome of one operation call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub elapsed: Duration,
    pub passed: bool,
}

/// Samples grouped by operation name
#[derive(Debug, Clone, Default)]
pub struct OperationSamples {
    by_operation: BTreeMap<String, Vec<Sample>>,
}

impl OperationSamples {
    pub fn record(&mut self, operation: &str, sample: Sample) {
        self.by_operation.entry(operation.to_string()).or_default().push(sample);
    }

    pub fn merge(&mut self, other: OperationSamples) {
        for (operation, samples) in other.by_operation {
            self.by_operation.entry(operation).or_default().extend(samples);
        }
    }

    pub fn get(&self, operation: &str) -> Option<&[Sample]> {
        self.by_operation.get(operation).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Sample])> {
        self.by_operation.iter().map(|(name, samples)| (name.as_str(), samples.as_slice()))
    }

    /// Every sample regardless of operation
    pub fn all(&self) -> impl Iterator<Item = &Sample> {
        self.by_operation.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.by_operation.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything one simulated user needs to run a scenario.
///
/// Each virtual user owns its accumulator handle and random source, so two
/// users never share mutable state. The harness keeps a clone of the
/// [`FailureRate`] to aggregate across users.
pub struct VirtualUser {
    id: usize,
    client: Arc<dyn GraphqlClient>,
    registry: Arc<OperationRegistry>,
    pools: Arc<ParameterPools>,
    failure_rate: FailureRate,
    rng: StdRng,
    samples: OperationSamples,
}

impl VirtualUser {
    /// With a `seed`, the user's random stream is `seed + id`; otherwise it
    /// is drawn from OS entropy.
    pub fn new(
        id: usize,
        client: Arc<dyn GraphqlClient>,
        registry: Arc<OperationRegistry>,
        pools: Arc<ParameterPools>,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(id as u64)),
            None => StdRng::from_entropy(),
        };

        Self {
            id,
            client,
            registry,
            pools,
            failure_rate: FailureRate::new(),
            rng,
            samples: OperationSamples::default(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn failure_rate(&self) -> &FailureRate {
        &self.failure_rate
    }

    pub fn samples(&self) -> &OperationSamples {
        &self.samples
    }

    pub fn take_samples(&mut self) -> OperationSamples {
        std::mem::take(&mut self.samples)
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Pick uniformly from `items` using this user's random source
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        pick(&mut self.rng, items)
    }

    pub fn random_collection_id(&mut self) -> Option<String> {
        pick(&mut self.rng, &self.pools.collection_ids).cloned()
    }

    pub fn random_product_id(&mut self) -> Option<String> {
        pick(&mut self.rng, &self.pools.product_ids).cloned()
    }

    /// Run a registered operation and return its `data`, if any.
    ///
    /// `overrides` replace the template's top-level default variables;
    /// pass `JsonValue::Null` to send the defaults.
    pub async fn call(&mut self, name: &str, overrides: JsonValue) -> ScenarioResult<Option<JsonValue>> {
        let operation = self.registry.operation(name, overrides)?;
        debug!(vu = self.id, operation = operation.name, "Calling operation");

        let options = QueryOptions::new(&self.failure_rate);
        let result = self
            .client
            .execute(operation.name, operation.query, operation.variables, &mut self.rng, &options)
            .await?;

        self.samples.record(
            operation.name,
            Sample {
                elapsed: result.elapsed,
                passed: result.passed(),
            },
        );
        Ok(take_data(result))
    }
}
