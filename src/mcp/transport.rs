//! Wire envelopes for the `POST /` endpoint.
//!
//! Every reply built here echoes the caller's `id` untouched and holds
//! either `result` or `error`, never both. Notifications get no envelope at
//! all; that decision belongs to the dispatcher.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

fn default_jsonrpc() -> String {
    JSONRPC_VERSION.to_string()
}

/// Incoming call. Only `method` is mandatory; a missing `jsonrpc` tag is
/// tolerated and a missing `id` reads as `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default = "default_jsonrpc")]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

/// Outgoing reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Value, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code: code.as_i32(),
                message: message.into(),
                data: None,
            }),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Body of the `error` member. `data` is never filled by this server but is
/// kept so foreign error objects still deserialize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Error codes this server emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    /// Body was not JSON.
    ParseError = -32700,
    /// JSON, but not a request object.
    InvalidRequest = -32600,
    /// Unknown method, or a `tools/call` naming no registered tool.
    MethodNotFound = -32601,
    InvalidParams = -32602,
    InternalError = -32603,
}

impl ErrorCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: Value) -> serde_json::Result<JsonRpcRequest> {
        serde_json::from_value(body)
    }

    #[test]
    fn test_jsonrpc_tag_is_optional() {
        let req = parse(json!({ "id": 7, "method": "initialize" })).unwrap();
        assert_eq!(req.jsonrpc, JSONRPC_VERSION);
        assert_eq!(req.id, 7);
        assert_eq!(req.params, None);
    }

    #[test]
    fn test_absent_id_reads_as_null() {
        let req = parse(json!({ "jsonrpc": "2.0", "method": "notifications/initialized" })).unwrap();
        assert_eq!(req.id, Value::Null);
    }

    #[test]
    fn test_method_is_required() {
        assert!(parse(json!({ "jsonrpc": "2.0", "id": 1 })).is_err());
        assert!(parse(json!({ "id": 1, "method": 5 })).is_err());
    }

    #[test]
    fn test_success_echoes_string_id_without_error_member() {
        let value =
            serde_json::to_value(JsonRpcResponse::success(json!("req-9"), json!({ "ok": true })))
                .unwrap();
        assert_eq!(
            value,
            json!({ "jsonrpc": "2.0", "id": "req-9", "result": { "ok": true } })
        );
    }

    #[test]
    fn test_error_reply_omits_result_and_data() {
        let resp = JsonRpcResponse::error(json!(1), ErrorCode::MethodNotFound, "Unknown tool");
        assert!(resp.is_error());
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": { "code": -32601, "message": "Unknown tool" }
            })
        );
    }
}
