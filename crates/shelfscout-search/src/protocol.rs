//! JSON-RPC 2.0 types for the catalog endpoint's `tools/call` method

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;

/// JSON-RPC request invoking a tool
#[derive(Debug, Serialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: &'static str,
    /// Method name
    pub method: &'static str,
    /// Request ID
    pub id: u64,
    /// Tool call parameters
    pub params: ToolCallParams,
}

/// Parameters of a `tools/call` request
#[derive(Debug, Serialize)]
pub struct ToolCallParams {
    /// Tool name
    pub name: String,
    /// Tool arguments
    pub arguments: Value,
}

impl JsonRpcRequest {
    /// Build a `tools/call` request
    pub fn tool_call(id: u64, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            method: "tools/call",
            id,
            params: ToolCallParams {
                name: name.into(),
                arguments,
            },
        }
    }
}

/// JSON-RPC response envelope
#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse {
    /// Request ID echoed back
    #[serde(default)]
    pub id: Option<Value>,
    /// Result on success
    #[serde(default)]
    pub result: Option<Value>,
    /// Error on failure
    #[serde(default)]
    pub error: Option<ErrorDetail>,
}

/// Error detail structure
#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    /// Error code
    #[serde(default)]
    pub code: i64,
    /// Error message
    #[serde(default)]
    pub message: String,
}

/// Result object of a tool call
#[derive(Debug, Default, Deserialize)]
pub struct ToolResult {
    /// Content blocks
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    /// Whether the tool reported failure
    #[serde(default, rename = "isError")]
    pub is_error: bool,
}

/// One content block of a tool result
#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    /// Block type, usually "text"
    #[serde(default, rename = "type")]
    pub kind: String,
    /// Text payload
    #[serde(default)]
    pub text: Option<String>,
}

impl ToolResult {
    /// Concatenated text of all text blocks
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| block.text.as_deref())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// First text block that parses as a JSON object
    pub fn json_payload(&self) -> Option<Value> {
        self.content
            .iter()
            .filter(|block| block.kind.is_empty() || block.kind == "text")
            .filter_map(|block| block.text.as_deref())
            .filter(|text| text.trim_start().starts_with('{'))
            .filter_map(|text| serde_json::from_str::<Value>(text).ok())
            .find(Value::is_object)
    }
}

/// The search payload inside a body that may still be a JSON-RPC envelope
///
/// Bodies that already carry `products`, `available_filters` or
/// `pagination` at the top level are returned as they are. Otherwise the
/// first JSON object found in `result.content[].text` is returned. Anything
/// else is returned unchanged for the caller to reject or ignore.
pub fn search_payload(body: &Value) -> Cow<'_, Value> {
    let direct = ["products", "available_filters", "availableFilters", "pagination"];
    if direct.iter().any(|key| body.get(key).is_some()) {
        return Cow::Borrowed(body);
    }

    let inner = body
        .get("result")
        .and_then(|result| serde_json::from_value::<ToolResult>(result.clone()).ok())
        .and_then(|result| result.json_payload());

    match inner {
        Some(payload) => Cow::Owned(payload),
        None => Cow::Borrowed(body),
    }
}
