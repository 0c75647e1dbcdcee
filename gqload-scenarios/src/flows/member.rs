use super::steps::series_products;
use super::Scenario;
use crate::context::VirtualUser;
use crate::error::ScenarioResult;
use serde_json::Value as JsonValue;

/// Membership page
pub struct MemberScenario;

#[async_trait::async_trait]
impl Scenario for MemberScenario {
    fn name(&self) -> &'static str {
        "member"
    }

    fn description(&self) -> &'static str {
        "Membership page: plans on shelf, distributor, member status and a random collection"
    }

    async fn run(&self, vu: &mut VirtualUser) -> ScenarioResult<()> {
        vu.call("membershipPlans", JsonValue::Null).await?;
        vu.call("getDistributor", JsonValue::Null).await?;
        vu.call("getUserMember", JsonValue::Null).await?;
        series_products(vu, None).await?;
        Ok(())
    }
}
