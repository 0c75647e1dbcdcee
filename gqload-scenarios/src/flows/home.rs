use super::Scenario;
use crate::context::VirtualUser;
use crate::error::ScenarioResult;
use serde_json::Value as JsonValue;

const STEPS: [&str; 11] = [
    "getMatomoSiteId",
    "maxDiscountMembershipPlan",
    "reportedDistributorRecord",
    "activeCustomer",
    "getDistributor",
    "getUserMember",
    "settings",
    "activeChannel",
    "getActiveOrderByType",
    "getSubscribeMessageTemplateId",
    "userClick",
];

/// Landing page load: session, channel and member bootstrap
pub struct HomeScenario;

#[async_trait::async_trait]
impl Scenario for HomeScenario {
    fn name(&self) -> &'static str {
        "home"
    }

    fn description(&self) -> &'static str {
        "Landing page: analytics, member plans, distributor, settings, channel and active order"
    }

    async fn run(&self, vu: &mut VirtualUser) -> ScenarioResult<()> {
        for step in STEPS {
            vu.call(step, JsonValue::Null).await?;
        }
        Ok(())
    }
}
