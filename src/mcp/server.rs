/// MCP protocol engine
///
/// Validates JSON-RPC envelopes, routes methods and fans batches out
/// concurrently. Transports hand it a parsed body plus an `OrgScope` and turn
/// the `Reply` into whatever their wire format needs.

use std::sync::Arc;

use futures::future::join_all;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::domain::Organization;
use crate::mcp::protocol::*;
use crate::mcp::registry::{OrgScope, ToolRegistry};
use crate::storage::{DocumentStore, StorageError};

/// Stateless request handler shared by every transport
#[derive(Clone)]
pub struct McpServer {
    store: Arc<dyn DocumentStore>,
    registry: Arc<ToolRegistry>,
}

impl McpServer {
    pub fn new(store: Arc<dyn DocumentStore>, registry: Arc<ToolRegistry>) -> Self {
        Self { store, registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Resolve a pinned organization for the transport
    pub async fn resolve_organization(&self, slug: &str) -> Result<Option<Organization>, StorageError> {
        self.store.find_organization_by_slug(slug).await
    }

    /// Handle a parsed message body: a single request or a batch
    pub async fn handle(&self, message: Value, scope: &OrgScope) -> Reply {
        match message {
            Value::Array(items) => {
                debug!("Processing batch of {} request(s)", items.len());
                let responses: Vec<JsonRpcResponse> =
                    join_all(items.into_iter().map(|item| self.handle_request(item, scope)))
                        .await
                        .into_iter()
                        .flatten()
                        .collect();

                if responses.is_empty() {
                    Reply::Empty
                } else {
                    Reply::Batch(responses)
                }
            }
            single => match self.handle_request(single, scope).await {
                Some(response) => Reply::Single(response),
                None => Reply::Empty,
            },
        }
    }

    /// Handle one request; `None` means nothing is sent back
    pub async fn handle_request(&self, value: Value, scope: &OrgScope) -> Option<JsonRpcResponse> {
        let request = match JsonRpcRequest::from_value(value) {
            Ok(request) => request,
            Err(rejected) => return Some(*rejected),
        };

        debug!("Processing request: {}", request.method);

        let notification = request.is_notification();
        let method = match McpMethod::parse(&request.method, request.params) {
            Ok(method) => method,
            Err(_) if notification => {
                debug!("Ignoring notification: {}", request.method);
                return None;
            }
            Err(error) => return Some(JsonRpcResponse::error(request.id, error)),
        };

        let result = match method {
            McpMethod::Initialize => {
                info!("MCP client connected");
                serde_json::to_value(InitializeResult::current())
            }
            McpMethod::ToolsList => Ok(json!({ "tools": self.registry.definitions() })),
            McpMethod::ToolsCall(params) => {
                let result = self.registry.call(self.store.as_ref(), scope, params).await;
                serde_json::to_value(result)
            }
            McpMethod::Ping => Ok(json!({})),
            McpMethod::Initialized => return None,
        };

        Some(match result {
            Ok(result) => JsonRpcResponse::success(request.id, result),
            Err(e) => JsonRpcResponse::error(
                request.id,
                JsonRpcError {
                    code: ErrorCode::InternalError,
                    message: format!("Failed to serialize result: {}", e),
                    data: None,
                },
            ),
        })
    }
}
