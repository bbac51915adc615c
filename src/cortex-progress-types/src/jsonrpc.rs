//! JSON-RPC 2.0 notification envelope.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC version string.
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 notification (no response expected).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JsonRpcNotification {
    /// JSON-RPC version (always "2.0").
    pub jsonrpc: String,
    /// Method name.
    pub method: String,
    /// Optional parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcNotification {
    /// Create a new JSON-RPC notification.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params: None,
        }
    }

    /// Add parameters to the notification.
    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_has_no_id() {
        let notification = JsonRpcNotification::new("window/progressDone")
            .with_params(serde_json::json!({"id": "x"}));

        let value = serde_json::to_value(&notification).expect("serialization should succeed");
        assert_eq!(value["jsonrpc"], JSONRPC_VERSION);
        assert_eq!(value["method"], "window/progressDone");
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_notification_without_params_omits_field() {
        let json = serde_json::to_string(&JsonRpcNotification::new("window/progressStart"))
            .expect("serialization should succeed");
        assert!(!json.contains("params"));
    }
}
