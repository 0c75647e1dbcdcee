use super::steps::series_products;
use super::Scenario;
use crate::context::VirtualUser;
use crate::error::ScenarioResult;
use serde_json::{json, Value as JsonValue};

const ACTIVITY_PAGE_ID: &str = "69";

/// Promotional landing page
pub struct CustomActivityScenario;

#[async_trait::async_trait]
impl Scenario for CustomActivityScenario {
    fn name(&self) -> &'static str {
        "custom-activity"
    }

    fn description(&self) -> &'static str {
        "Promotion page: activity custom page, hot words, a random collection and featured products"
    }

    async fn run(&self, vu: &mut VirtualUser) -> ScenarioResult<()> {
        vu.call("customPage", json!({ "customPageId": ACTIVITY_PAGE_ID }))
            .await?;
        vu.call("hotWords", JsonValue::Null).await?;
        vu.call("getDistributor", JsonValue::Null).await?;
        series_products(vu, None).await?;
        vu.call("products", JsonValue::Null).await?;
        Ok(())
    }
}
