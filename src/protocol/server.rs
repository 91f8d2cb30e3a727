//! MCP request dispatch
//!
//! Maps JSON-RPC methods onto the tool system. Tool failures are reported
//! inside a successful `tools/call` result flagged `isError`; only protocol
//! misuse becomes a JSON-RPC error.

use crate::config::ServerSection;
use crate::error::GatewayError;
use crate::protocol::messages::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION};
use crate::tools::ToolSystem;
use serde_json::{json, Value};
use tracing::{debug, warn};

pub const DEFAULT_PROTOCOL_VERSION: &str = "2024-11-05";

pub struct McpServer {
    info: ServerSection,
    tools: ToolSystem,
}

impl McpServer {
    pub fn new(info: ServerSection, tools: ToolSystem) -> Self {
        Self { info, tools }
    }

    pub fn tools(&self) -> &ToolSystem {
        &self.tools
    }

    /// Handle one message. Notifications produce `None`
    pub async fn handle(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            debug!(method = %request.method, "Received notification");
            return None;
        }

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::failure(
                request.id,
                JsonRpcError::invalid_request(format!(
                    "Unsupported jsonrpc version '{}'",
                    request.jsonrpc
                )),
            ));
        }

        let params = request.params.unwrap_or(Value::Null);
        let result = match request.method.as_str() {
            "initialize" => Ok(self.initialize(&params)),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(self.list_tools()),
            "tools/call" => self.call_tool(&params).await,
            "resources/list" => Ok(json!({ "resources": [] })),
            method => Err(JsonRpcError::method_not_found(method)),
        };

        Some(match result {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err(error) => JsonRpcResponse::failure(request.id, error),
        })
    }

    fn initialize(&self, params: &Value) -> Value {
        let protocol_version = params
            .get("protocolVersion")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_PROTOCOL_VERSION);

        json!({
            "protocolVersion": protocol_version,
            "capabilities": {
                "tools": { "listChanged": false },
                "resources": { "listChanged": true }
            },
            "serverInfo": {
                "name": self.info.name,
                "version": self.info.version
            }
        })
    }

    fn list_tools(&self) -> Value {
        let tools: Vec<Value> = self
            .tools
            .descriptions()
            .into_iter()
            .map(|description| {
                json!({
                    "name": description.name,
                    "description": description.description,
                    "inputSchema": description.parameters
                })
            })
            .collect();

        json!({ "tools": tools })
    }

    async fn call_tool(&self, params: &Value) -> Result<Value, JsonRpcError> {
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| JsonRpcError::invalid_params("tools/call requires a string 'name'"))?;
        let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

        match self.tools.execute_tool(name, &arguments).await {
            Ok(value) => Ok(tool_success(value)),
            Err(error) => {
                warn!(tool = name, kind = error.kind(), error = %error, "Tool call failed");
                Ok(tool_failure(&error))
            }
        }
    }
}

fn tool_success(value: Value) -> Value {
    let text = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
    let mut result = json!({
        "content": [{ "type": "text", "text": text }],
        "isError": false
    });
    // structuredContent must be an object.
    if value.is_object() {
        result["structuredContent"] = value;
    }
    result
}

fn tool_failure(error: &GatewayError) -> Value {
    json!({
        "content": [{ "type": "text", "text": error.to_string() }],
        "structuredContent": error.to_payload(),
        "isError": true
    })
}
