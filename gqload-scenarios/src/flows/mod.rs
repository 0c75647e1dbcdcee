//! Scenario drivers: ordered user journeys through the storefront

mod cart;
mod catalog;
mod custom_activity;
mod home;
mod member;
mod order;
mod product_details;
pub mod steps;

pub use cart::CartScenario;
pub use catalog::CatalogScenario;
pub use custom_activity::CustomActivityScenario;
pub use home::HomeScenario;
pub use member::MemberScenario;
pub use order::OrderScenario;
pub use product_details::ProductDetailsScenario;

use crate::context::VirtualUser;
use crate::error::{ScenarioError, ScenarioResult};
use std::sync::Arc;

/// One simulated user journey.
///
/// Steps run in a fixed order whether or not earlier steps returned data.
/// Only steps that consume an earlier step's result are skipped when that
/// result is missing.
#[async_trait::async_trait]
pub trait Scenario: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    async fn run(&self, vu: &mut VirtualUser) -> ScenarioResult<()>;
}

/// Every built-in scenario
pub fn all_scenarios() -> Vec<Arc<dyn Scenario>> {
    vec![
        Arc::new(HomeScenario),
        Arc::new(CatalogScenario),
        Arc::new(CustomActivityScenario),
        Arc::new(ProductDetailsScenario),
        Arc::new(CartScenario),
        Arc::new(OrderScenario),
        Arc::new(MemberScenario),
    ]
}

pub fn find_scenario(name: &str) -> ScenarioResult<Arc<dyn Scenario>> {
    all_scenarios()
        .into_iter()
        .find(|scenario| scenario.name() == name)
        .ok_or_else(|| ScenarioError::UnknownScenario(name.to_string()))
}
