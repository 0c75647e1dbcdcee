//! Named GraphQL operation templates shared by every scenario

use crate::error::{ScenarioError, ScenarioResult};
use serde::Serialize;
use serde_json::{json, Map, Value as JsonValue};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Query,
    Mutation,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Query => write!(f, "query"),
            OperationKind::Mutation => write!(f, "mutation"),
        }
    }
}

/// One operation ready to post
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub name: &'static str,
    pub query: &'static str,
    pub variables: JsonValue,
}

/// Query text plus the variables it is sent with unless overridden
#[derive(Debug, Clone)]
pub struct OperationTemplate {
    pub name: &'static str,
    pub kind: OperationKind,
    pub query: &'static str,
    pub default_variables: JsonValue,
}

impl OperationTemplate {
    pub fn new(name: &'static str, kind: OperationKind, query: &'static str, default_variables: JsonValue) -> Self {
        Self {
            name,
            kind,
            query,
            default_variables,
        }
    }

    /// Build an operation, replacing top-level default variables with
    /// those in `overrides`. `Null` keeps the defaults untouched.
    pub fn operation(&self, overrides: JsonValue) -> ScenarioResult<Operation> {
        let mut variables = match &self.default_variables {
            JsonValue::Object(defaults) => defaults.clone(),
            _ => Map::new(),
        };

        match overrides {
            JsonValue::Null => {}
            JsonValue::Object(overrides) => variables.extend(overrides),
            other => {
                return Err(ScenarioError::InvalidVariables {
                    operation: self.name.to_string(),
                    found: json_type_name(&other).to_string(),
                })
            }
        }

        Ok(Operation {
            name: self.name,
            query: self.query,
            variables: JsonValue::Object(variables),
        })
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Templates keyed by operation name
#[derive(Debug, Clone, Default)]
pub struct OperationRegistry {
    templates: BTreeMap<&'static str, OperationTemplate>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every storefront operation the scenarios issue
    pub fn builtin() -> ScenarioResult<Self> {
        Self::from_templates(builtin_templates())
    }

    /// Register each template in order, failing on the first repeated name
    pub fn from_templates(
        templates: impl IntoIterator<Item = OperationTemplate>,
    ) -> ScenarioResult<Self> {
        templates.into_iter().try_fold(Self::new(), |mut registry, template| {
            registry.register(template)?;
            Ok(registry)
        })
    }

    /// Add a template. A name can only be registered once.
    pub fn register(&mut self, template: OperationTemplate) -> ScenarioResult<()> {
        if self.templates.contains_key(template.name) {
            return Err(ScenarioError::DuplicateOperation(template.name.to_string()));
        }
        self.templates.insert(template.name, template);
        Ok(())
    }

    pub fn get(&self, name: &str) -> ScenarioResult<&OperationTemplate> {
        self.templates
            .get(name)
            .ok_or_else(|| ScenarioError::UnknownOperation(name.to_string()))
    }

    /// Shorthand for `get(name)?.operation(overrides)`
    pub fn operation(&self, name: &str, overrides: JsonValue) -> ScenarioResult<Operation> {
        self.get(name)?.operation(overrides)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OperationTemplate> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

macro_rules! query_file {
    ($file:literal) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/queries/", $file, ".graphql"))
    };
}

fn builtin_templates() -> Vec<OperationTemplate> {
    use OperationKind::{Mutation, Query};

    let empty = || json!({});

    vec![
        // Home page
        OperationTemplate::new("getMatomoSiteId", Query, query_file!("get_matomo_site_id"), empty()),
        OperationTemplate::new(
            "maxDiscountMembershipPlan",
            Query,
            query_file!("max_discount_membership_plan"),
            empty(),
        ),
        OperationTemplate::new(
            "reportedDistributorRecord",
            Mutation,
            query_file!("reported_distributor_record"),
            json!({"md5Str": "", "sourceCode": "1001", "distributionId": ""}),
        ),
        OperationTemplate::new("activeCustomer", Query, query_file!("active_customer"), empty()),
        OperationTemplate::new("getDistributor", Query, query_file!("get_distributor"), empty()),
        OperationTemplate::new("getUserMember", Query, query_file!("get_user_member"), empty()),
        OperationTemplate::new(
            "settings",
            Query,
            query_file!("settings"),
            json!({
                "keyNames": [
                    "memberCardProductGroup",
                    "personalCenterProductGroup",
                    "searchResultProductGroup",
                    "shoppingCartProductGroup",
                    "couponPageProductGroup",
                    "productDetailProductGroup",
                    "canBackProductDetailPage"
                ]
            }),
        ),
        OperationTemplate::new("activeChannel", Query, query_file!("active_channel"), empty()),
        OperationTemplate::new(
            "getActiveOrderByType",
            Query,
            query_file!("get_active_order_by_type"),
            json!({"type": "shoppingTrolley", "isRemoveMarkUp": false}),
        ),
        OperationTemplate::new(
            "getSubscribeMessageTemplateId",
            Query,
            query_file!("get_subscribe_message_template_id"),
            empty(),
        ),
        OperationTemplate::new("userClick", Mutation, query_file!("user_click"), empty()),
        // Catalog
        OperationTemplate::new(
            "customPage",
            Query,
            query_file!("custom_page"),
            json!({
                "customPageId": "",
                "options": {
                    "filter": {
                        "type": {"eq": "commodityGroupPage"},
                        "enable": {"eq": true}
                    }
                }
            }),
        ),
        OperationTemplate::new(
            "hotWords",
            Query,
            query_file!("hot_words"),
            json!({"options": {"take": 99, "sort": {"createdAt": "DESC"}}}),
        ),
        OperationTemplate::new("getAnnouncement", Query, query_file!("get_announcement"), empty()),
        OperationTemplate::new(
            "seriesProducts",
            Query,
            query_file!("series_products"),
            json!({
                "collectionId": "",
                "options": {
                    "filter": {"hidden": {"eq": false}, "freeGift": {"eq": false}},
                    "sort": {"id": "ASC", "createdAt": "DESC"}
                }
            }),
        ),
        OperationTemplate::new(
            "products",
            Query,
            query_file!("products"),
            json!({"options": {"take": 50, "filter": {"id": {"in": ["4486"]}}}}),
        ),
        OperationTemplate::new(
            "membershipPlans",
            Query,
            query_file!("membership_plans"),
            json!({"options": {"filter": {"state": {"eq": "shelf"}, "isShow": {"eq": true}}}}),
        ),
        // Product details
        OperationTemplate::new("product", Query, query_file!("product"), json!({"id": ""})),
        OperationTemplate::new(
            "userClickProduct",
            Mutation,
            query_file!("user_click_product"),
            json!({"productId": "4581"}),
        ),
        OperationTemplate::new(
            "getPurchaseQuantity",
            Query,
            query_file!("get_purchase_quantity"),
            json!({"productId": "", "type": "regularOrder", "isIncludeCurrentOrder": false}),
        ),
        // Cart and orders
        OperationTemplate::new(
            "getShoppingCart",
            Query,
            query_file!("get_shopping_cart"),
            json!({"isRemoveMarkUp": true, "isUseMember": true}),
        ),
        OperationTemplate::new(
            "orderPromotionResult",
            Query,
            query_file!("order_promotion_result"),
            json!({"orderIds": []}),
        ),
        OperationTemplate::new(
            "orders",
            Query,
            query_file!("orders"),
            json!({
                "options": {
                    "take": 10,
                    "skip": 0,
                    "filter": {
                        "state": {"notIn": ["AddingItems", "DelayDeliver"], "contains": ""}
                    },
                    "sort": {"timeToPlaceOrder": "DESC"}
                }
            }),
        ),
        OperationTemplate::new("order", Query, query_file!("order"), json!({"id": ""})),
        OperationTemplate::new(
            "afterSaleByOrderId",
            Query,
            query_file!("after_sale_by_order_id"),
            json!({"orderId": "", "options": {"filter": {"state": {"notEq": "cancel"}}}}),
        ),
        OperationTemplate::new(
            "freeGiftByOrder",
            Query,
            query_file!("free_gift_by_order"),
            json!({"orderId": ""}),
        ),
        OperationTemplate::new(
            "orderPaymentRewardCoupons",
            Query,
            query_file!("order_payment_reward_coupons"),
            json!({"orderId": ""}),
        ),
    ]
}
