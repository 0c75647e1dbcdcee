//! Storefront scenarios for gqload
//!
//! Operations are registered once by name in an [`OperationRegistry`] and
//! issued through a [`VirtualUser`], which carries the per-user failure
//! accumulator and seedable random source that every step draws from.

pub mod context;
pub mod error;
pub mod flows;
pub mod pools;
pub mod registry;

pub use context::{OperationSamples, Sample, VirtualUser};
pub use error::{ScenarioError, ScenarioResult};
pub use flows::{all_scenarios, find_scenario, Scenario};
pub use pools::{pick, ParameterPools};
pub use registry::{Operation, OperationKind, OperationRegistry, OperationTemplate};
