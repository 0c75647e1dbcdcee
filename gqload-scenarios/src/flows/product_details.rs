use super::steps::{get_purchase_quantity, series_products};
use super::Scenario;
use crate::context::VirtualUser;
use crate::error::ScenarioResult;
use serde_json::{json, Value as JsonValue};
use tracing::info;

const VIEWED_PRODUCT_ID: &str = "4581";

/// Open a product page and check purchase limits
pub struct ProductDetailsScenario;

#[async_trait::async_trait]
impl Scenario for ProductDetailsScenario {
    fn name(&self) -> &'static str {
        "product-details"
    }

    fn description(&self) -> &'static str {
        "Product page: random product, customer, click tracking and purchase quantities"
    }

    async fn run(&self, vu: &mut VirtualUser) -> ScenarioResult<()> {
        match vu.random_product_id() {
            Some(id) => {
                vu.call("product", json!({ "id": id })).await?;
            }
            None => info!(vu = vu.id(), "No product id available, skipping product"),
        }
        vu.call("activeCustomer", JsonValue::Null).await?;
        vu.call("getDistributor", JsonValue::Null).await?;
        series_products(vu, None).await?;
        vu.call("userClickProduct", JsonValue::Null).await?;
        get_purchase_quantity(vu, VIEWED_PRODUCT_ID, "regularOrder", false).await?;
        get_purchase_quantity(vu, VIEWED_PRODUCT_ID, "shoppingTrolley", true).await?;
        Ok(())
    }
}
