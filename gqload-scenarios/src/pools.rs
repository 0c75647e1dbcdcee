//! Randomized parameter pools

use gqload_config::PoolsConfig;
use rand::seq::SliceRandom;
use rand::Rng;

/// Static id lists request arguments are drawn from. Immutable for a run.
#[derive(Debug, Clone, Default)]
pub struct ParameterPools {
    pub collection_ids: Vec<String>,
    pub product_ids: Vec<String>,
}

impl ParameterPools {
    pub fn new(collection_ids: Vec<String>, product_ids: Vec<String>) -> Self {
        Self {
            collection_ids,
            product_ids,
        }
    }
}

impl From<&PoolsConfig> for ParameterPools {
    fn from(config: &PoolsConfig) -> Self {
        Self::new(config.collection_ids.clone(), config.product_ids.clone())
    }
}

/// Uniformly pick one element, `None` for an empty slice.
pub fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    items.choose(rng)
}
