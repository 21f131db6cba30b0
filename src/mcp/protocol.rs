/// MCP (Model Context Protocol) message structures and JSON-RPC handling
///
/// Defines the JSON-RPC envelope MCP clients speak, the typed set of methods
/// this server routes, and the uniform tool result shape.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use jsonrpc_core::{Error as JsonRpcError, ErrorCode};

/// MCP protocol version we support
pub const MCP_VERSION: &str = "2024-11-05";

/// JSON-RPC version identifier
pub const JSONRPC_VERSION: &str = "2.0";

/// Server name reported by `initialize` and the HTTP descriptor
pub const SERVER_NAME: &str = "orgdocs-mcp";

/// A validated JSON-RPC 2.0 request
///
/// `id` is kept exactly as received: `None` when the field was absent,
/// `Some(Value::Null)` when it was an explicit null.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRpcRequest {
    pub id: Option<Value>,
    pub method: String,
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Validate a raw JSON value as a request envelope
    ///
    /// On failure the returned error response already carries whatever id
    /// could be recovered from the input.
    pub fn from_value(value: Value) -> Result<Self, Box<JsonRpcResponse>> {
        let Value::Object(mut object) = value else {
            return Err(Box::new(JsonRpcResponse::error(None, invalid_request())));
        };

        let id = object.remove("id");

        if object.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
            return Err(Box::new(JsonRpcResponse::error(id, invalid_request())));
        }

        let method = match object.remove("method") {
            Some(Value::String(method)) => method,
            _ => return Err(Box::new(JsonRpcResponse::error(id, invalid_request()))),
        };

        Ok(Self {
            id,
            method,
            params: object.remove("params"),
        })
    }

    /// An id-less `notifications/*` message, which must never be answered
    pub fn is_notification(&self) -> bool {
        self.id.is_none() && self.method.starts_with("notifications/")
    }
}

/// JSON-RPC 2.0 response message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    /// Echoed from the request; omitted when the request had none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Create a successful response
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response
    pub fn error(id: Option<Value>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Parse error for a body that isn't JSON at all; the id is always null
    pub fn parse_error() -> Self {
        Self::error(Some(Value::Null), JsonRpcError::parse_error())
    }
}

/// `-32600` with the conventional "Invalid Request" message
fn invalid_request() -> JsonRpcError {
    JsonRpcError {
        code: ErrorCode::InvalidRequest,
        message: "Invalid Request".to_string(),
        data: None,
    }
}

/// Methods this server routes, with their params already narrowed
#[derive(Debug, Clone, PartialEq)]
pub enum McpMethod {
    Initialize,
    /// `notifications/initialized`; never answered
    Initialized,
    ToolsList,
    ToolsCall(CallToolParams),
    Ping,
}

impl McpMethod {
    /// Route a method name and narrow its params
    pub fn parse(method: &str, params: Option<Value>) -> Result<Self, JsonRpcError> {
        match method {
            "initialize" => Ok(Self::Initialize),
            "notifications/initialized" => Ok(Self::Initialized),
            "tools/list" => Ok(Self::ToolsList),
            "tools/call" => {
                let params = params.ok_or_else(|| {
                    JsonRpcError::invalid_params("Missing parameters for tools/call")
                })?;
                serde_json::from_value(params)
                    .map(Self::ToolsCall)
                    .map_err(|e| JsonRpcError::invalid_params(format!("Invalid parameters: {}", e)))
            }
            "ping" => Ok(Self::Ping),
            other => Err(JsonRpcError {
                code: ErrorCode::MethodNotFound,
                message: format!("Method not found: {}", other),
                data: None,
            }),
        }
    }
}

/// MCP tool call parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CallToolParams {
    /// Name of the tool to call (e.g., "search_docs")
    pub name: String,
    /// Arguments to pass to the tool
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

/// MCP tool call result
///
/// Every tool produces this shape, whether it succeeded or not.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolCallResult {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError", skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

/// Content returned by a tool
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    Text { text: String },
}

impl ToolCallResult {
    /// Create a successful tool result with text content
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Create an error tool result the caller can read and recover from
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: format!("Error: {}", message.into()),
            }],
            is_error: true,
        }
    }

    /// Text of the first content block
    pub fn text(&self) -> &str {
        match self.content.first() {
            Some(ToolContent::Text { text }) => text,
            None => "",
        }
    }
}

/// MCP tool definition as returned by `tools/list`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// MCP initialization response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    pub server_info: ServerInfo,
}

/// Capabilities advertised to clients; only tools
#[derive(Debug, Serialize)]
pub struct ServerCapabilities {
    pub tools: ToolsCapability,
}

/// Serializes as `{}`
#[derive(Debug, Serialize)]
pub struct ToolsCapability {}

/// Information about this server
#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

impl InitializeResult {
    pub fn current() -> Self {
        Self {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {},
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }
}

/// What a message produced, independent of transport
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Single(JsonRpcResponse),
    Batch(Vec<JsonRpcResponse>),
    /// Nothing to send back (a notification, or a batch of only notifications)
    Empty,
}
