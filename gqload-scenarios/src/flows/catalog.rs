use super::steps::series_products;
use super::Scenario;
use crate::context::VirtualUser;
use crate::error::ScenarioResult;
use serde_json::Value as JsonValue;

/// Browse all products
pub struct CatalogScenario;

#[async_trait::async_trait]
impl Scenario for CatalogScenario {
    fn name(&self) -> &'static str {
        "catalog"
    }

    fn description(&self) -> &'static str {
        "All-products page: custom page, announcement, hot words and a random collection"
    }

    async fn run(&self, vu: &mut VirtualUser) -> ScenarioResult<()> {
        vu.call("customPage", JsonValue::Null).await?;
        vu.call("getAnnouncement", JsonValue::Null).await?;
        vu.call("hotWords", JsonValue::Null).await?;
        series_products(vu, None).await?;
        vu.call("getDistributor", JsonValue::Null).await?;
        Ok(())
    }
}
