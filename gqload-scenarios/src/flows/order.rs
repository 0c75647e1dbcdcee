use super::steps::{id_of, order_promotion_result};
use super::Scenario;
use crate::context::VirtualUser;
use crate::error::ScenarioResult;
use serde_json::{json, Value as JsonValue};
use tracing::info;

/// Browse the order list and drill into one order
pub struct OrderScenario;

#[async_trait::async_trait]
impl Scenario for OrderScenario {
    fn name(&self) -> &'static str {
        "order"
    }

    fn description(&self) -> &'static str {
        "Order list, then detail, after-sale, promotion, gift and reward coupons for a random order"
    }

    async fn run(&self, vu: &mut VirtualUser) -> ScenarioResult<()> {
        let Some(data) = vu.call("orders", JsonValue::Null).await? else {
            info!(vu = vu.id(), "orders returned no data, skipping order detail");
            return Ok(());
        };

        let items = data["orders"]["items"].as_array().map(Vec::as_slice).unwrap_or_default();
        let Some(order_id) = vu.choose(items).and_then(id_of) else {
            info!(vu = vu.id(), "order id not found, skipping order detail");
            return Ok(());
        };

        vu.call("order", json!({ "id": order_id })).await?;
        vu.call("afterSaleByOrderId", json!({ "orderId": order_id }))
            .await?;
        order_promotion_result(vu, vec![order_id.clone()]).await?;
        vu.call("afterSaleByOrderId", json!({ "orderId": order_id }))
            .await?;
        vu.call("freeGiftByOrder", json!({ "orderId": order_id })).await?;
        vu.call("orderPaymentRewardCoupons", json!({ "orderId": order_id }))
            .await?;
        Ok(())
    }
}
