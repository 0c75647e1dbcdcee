//! Steps shared by more than one journey

use crate::context::VirtualUser;
use crate::error::ScenarioResult;
use serde_json::{json, Value as JsonValue};
use tracing::info;

/// `seriesProducts` for `collection_id`, or a random pooled collection.
///
/// Skipped when neither is available.
pub async fn series_products(vu: &mut VirtualUser, collection_id: Option<String>) -> ScenarioResult<Option<JsonValue>> {
    let Some(collection_id) = collection_id.or_else(|| vu.random_collection_id()) else {
        info!(vu = vu.id(), "No collection id available, skipping seriesProducts");
        return Ok(None);
    };
    vu.call("seriesProducts", json!({ "collectionId": collection_id })).await
}

pub async fn get_purchase_quantity(
    vu: &mut VirtualUser,
    product_id: &str,
    purchase_type: &str,
    include_current_order: bool,
) -> ScenarioResult<Option<JsonValue>> {
    vu.call(
        "getPurchaseQuantity",
        json!({
            "productId": product_id,
            "type": purchase_type,
            "isIncludeCurrentOrder": include_current_order,
        }),
    )
    .await
}

pub async fn order_promotion_result(vu: &mut VirtualUser, order_ids: Vec<String>) -> ScenarioResult<Option<JsonValue>> {
    vu.call("orderPromotionResult", json!({ "orderIds": order_ids })).await
}

/// GraphQL `ID` values arrive as strings or numbers
pub fn id_of(value: &JsonValue) -> Option<String> {
    match value.get("id")? {
        JsonValue::String(id) if !id.is_empty() => Some(id.clone()),
        JsonValue::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_of() {
        assert_eq!(id_of(&json!({"id": "12"})), Some("12".to_string()));
        assert_eq!(id_of(&json!({"id": 12})), Some("12".to_string()));
        assert_eq!(id_of(&json!({"id": ""})), None);
        assert_eq!(id_of(&json!({"id": null})), None);
        assert_eq!(id_of(&json!(null)), None);
        assert_eq!(id_of(&json!({})), None);
    }
}
