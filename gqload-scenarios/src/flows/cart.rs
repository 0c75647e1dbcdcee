use super::steps::{id_of, order_promotion_result, series_products};
use super::Scenario;
use crate::context::VirtualUser;
use crate::error::ScenarioResult;
use serde_json::Value as JsonValue;
use tracing::info;

/// View the shopping cart
pub struct CartScenario;

/// Ids of the buy-now and trolley orders present in a `getShoppingCart` result
pub fn cart_order_ids(data: &JsonValue) -> Vec<String> {
    let cart = &data["getShoppingCart"];
    ["outrightPurchase", "shoppingTrolley"]
        .iter()
        .filter_map(|kind| id_of(&cart[*kind]))
        .collect()
}

#[async_trait::async_trait]
impl Scenario for CartScenario {
    fn name(&self) -> &'static str {
        "cart"
    }

    fn description(&self) -> &'static str {
        "Shopping cart: cart contents, their promotion result, member and a random collection"
    }

    async fn run(&self, vu: &mut VirtualUser) -> ScenarioResult<()> {
        let order_ids = vu
            .call("getShoppingCart", JsonValue::Null)
            .await?
            .map(|data| cart_order_ids(&data))
            .unwrap_or_default();

        if order_ids.is_empty() {
            info!(vu = vu.id(), "Cart has no orders, skipping orderPromotionResult");
        } else {
            order_promotion_result(vu, order_ids).await?;
        }

        vu.call("getUserMember", JsonValue::Null).await?;
        series_products(vu, None).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cart_order_ids() {
        let data = json!({"getShoppingCart": {
            "outrightPurchase": {"id": "7"},
            "shoppingTrolley": {"id": 8}
        }});
        assert_eq!(cart_order_ids(&data), vec!["7", "8"]);

        let partial = json!({"getShoppingCart": {"outrightPurchase": null, "shoppingTrolley": {"id": "9"}}});
        assert_eq!(cart_order_ids(&partial), vec!["9"]);

        assert!(cart_order_ids(&json!({"getShoppingCart": null})).is_empty());
    }
}
