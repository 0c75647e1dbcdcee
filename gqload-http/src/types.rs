//! Request and response types for GraphQL over HTTP

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::time::Duration;

/// JSON body of a GraphQL POST
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequest {
    pub query: String,
    pub variables: JsonValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

impl GraphqlRequest {
    pub fn new(query: impl Into<String>, variables: JsonValue) -> Self {
        Self {
            query: query.into(),
            variables,
            operation_name: None,
        }
    }

    pub fn with_operation_name(mut self, operation_name: impl Into<String>) -> Self {
        self.operation_name = Some(operation_name.into());
        self
    }
}

/// Outcome of a single GraphQL POST.
///
/// `status` is `None` when no HTTP response arrived at all, and `body` is
/// `None` when the response carried no payload.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub operation: String,
    pub status: Option<u16>,
    pub body: Option<JsonValue>,
    pub elapsed: Duration,
}

impl ExecutionResult {
    /// The status check: HTTP 200 exactly
    pub fn passed(&self) -> bool {
        self.status == Some(200)
    }

    /// The `data` member of the body, if present and non-null
    pub fn data(&self) -> Option<&JsonValue> {
        self.body
            .as_ref()
            .and_then(|body| body.get("data"))
            .filter(|data| !data.is_null())
    }

    pub fn into_data(self) -> Option<JsonValue> {
        match self.body {
            Some(JsonValue::Object(mut body)) => body.remove("data").filter(|data| !data.is_null()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(status: Option<u16>, body: Option<JsonValue>) -> ExecutionResult {
        ExecutionResult {
            operation: "getAnnouncement".to_string(),
            status,
            body,
            elapsed: Duration::from_millis(3),
        }
    }

    #[test]
    fn test_request_omits_missing_operation_name() {
        let request = GraphqlRequest::new("query { x }", json!({}));
        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(encoded, json!({"query": "query { x }", "variables": {}}));

        let named = request.with_operation_name("x");
        let encoded = serde_json::to_value(&named).unwrap();
        assert_eq!(encoded["operationName"], "x");
    }

    #[test]
    fn test_passed_requires_exact_200() {
        assert!(result(Some(200), None).passed());
        assert!(!result(Some(201), None).passed());
        assert!(!result(Some(500), None).passed());
        assert!(!result(None, None).passed());
    }

    #[test]
    fn test_data_extraction() {
        let body = json!({"data": {"getAnnouncement": {"id": "1", "value": "hi"}}});
        let ok = result(Some(200), Some(body));
        assert_eq!(ok.data().unwrap()["getAnnouncement"]["value"], "hi");
        assert_eq!(
            ok.into_data(),
            Some(json!({"getAnnouncement": {"id": "1", "value": "hi"}}))
        );

        let errors_only = result(Some(200), Some(json!({"errors": [{"message": "boom"}]})));
        assert!(errors_only.data().is_none());
        assert!(errors_only.into_data().is_none());

        let null_data = result(Some(200), Some(json!({"data": null})));
        assert!(null_data.into_data().is_none());

        assert!(result(None, None).into_data().is_none());
    }
}
