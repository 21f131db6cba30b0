/// HTTP transport
///
/// `GET` returns a server descriptor, `POST` carries JSON-RPC. In
/// `TenancyMode::Path` the endpoint is `/mcp/{org}` and the organization is
/// resolved before the engine runs; in `TenancyMode::Argument` it is `/mcp`
/// and each tool call names its organization.

use std::any::Any;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{error, warn};

use crate::config::TenancyMode;
use crate::domain::Organization;
use crate::mcp::protocol::*;
use crate::mcp::registry::OrgScope;
use crate::mcp::McpServer;

/// Shared state for the HTTP handlers
#[derive(Clone)]
struct AppState {
    server: Arc<McpServer>,
}

/// Build the router for the server's tenancy mode
pub fn router(server: Arc<McpServer>) -> Router {
    let routes = match server.registry().tenancy() {
        TenancyMode::Path => {
            Router::new().route("/mcp/:org", get(describe_pinned).post(post_pinned))
        }
        TenancyMode::Argument => Router::new().route("/mcp", get(describe).post(post)),
    };

    routes
        .route("/healthz", get(healthz))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { server })
}

async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn descriptor(server: &McpServer, endpoint: String, organization: Option<&Organization>) -> Value {
    let mut body = json!({
        "name": SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Published documentation exposed as MCP tools",
        "tools": server.registry().names(),
        "usage": format!("POST JSON-RPC 2.0 requests (single or batch) to {}", endpoint),
        "endpoint": endpoint,
        "protocol": format!("MCP {} over JSON-RPC {}", MCP_VERSION, JSONRPC_VERSION),
    });
    if let Some(org) = organization {
        body["organization"] = json!({ "name": org.name, "slug": org.slug });
    }
    body
}

async fn describe(State(state): State<AppState>) -> Json<Value> {
    Json(descriptor(&state.server, "/mcp".to_string(), None))
}

async fn describe_pinned(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    match state.server.resolve_organization(&slug).await {
        Ok(Some(org)) => {
            Json(descriptor(&state.server, format!("/mcp/{}", org.slug), Some(&org))).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("Organization '{}' not found", slug) })),
        )
            .into_response(),
        Err(e) => {
            error!("Organization lookup for '{}' failed: {}", slug, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to look up organization" })),
            )
                .into_response()
        }
    }
}

async fn post(State(state): State<AppState>, body: Bytes) -> Response {
    process(&state.server, &body, &OrgScope::PerCall).await
}

async fn post_pinned(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    body: Bytes,
) -> Response {
    let org = match state.server.resolve_organization(&slug).await {
        Ok(Some(org)) => org,
        Ok(None) => {
            warn!("Request for unknown organization '{}'", slug);
            let error = JsonRpcError::invalid_params(format!("Organization '{}' not found", slug));
            return (
                StatusCode::NOT_FOUND,
                Json(JsonRpcResponse::error(Some(Value::Null), error)),
            )
                .into_response();
        }
        Err(e) => {
            error!("Organization lookup for '{}' failed: {}", slug, e);
            return internal_error_response();
        }
    };

    process(&state.server, &body, &OrgScope::Pinned(org)).await
}

async fn process(server: &McpServer, body: &[u8], scope: &OrgScope) -> Response {
    let message: Value = match serde_json::from_slice(body) {
        Ok(message) => message,
        Err(e) => {
            warn!("Rejecting unparseable request body: {}", e);
            return (StatusCode::BAD_REQUEST, Json(JsonRpcResponse::parse_error())).into_response();
        }
    };

    match server.handle(message, scope).await {
        Reply::Single(response) => Json(response).into_response(),
        Reply::Batch(responses) => Json(responses).into_response(),
        Reply::Empty => StatusCode::NO_CONTENT.into_response(),
    }
}

fn internal_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(JsonRpcResponse::error(Some(Value::Null), JsonRpcError::internal_error())),
    )
        .into_response()
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!("Request handler panicked: {}", detail);
    internal_error_response()
}
