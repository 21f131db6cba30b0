/// HTTP transport tests, driven through the router without a socket
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use orgdocs_mcp::mcp::http::router;
use orgdocs_mcp::*;

use super::common::{engine, seeded_store};

fn app(tenancy: TenancyMode) -> Router {
    let (store, org) = seeded_store(None);
    store
        .upsert_document(&Document::new(org.id, "intro", "Introduction", "Welcome to Acme", 0))
        .expect("Failed to insert document");
    router(engine(store, tenancy))
}

async fn post(app: Router, uri: &str, body: &str) -> (StatusCode, Option<Value>) {
    let response = app
        .oneshot(
            Request::post(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        None
    } else {
        Some(serde_json::from_slice(&bytes).unwrap())
    };
    (status, value)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_unparseable_body_is_400_parse_error() {
    let (status, body) = post(app(TenancyMode::Argument), "/mcp", "{not json").await;
    let body = body.unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], -32700);
    assert_eq!(body["id"], Value::Null);
}

#[tokio::test]
async fn test_notification_only_batch_is_204() {
    let (status, body) = post(
        app(TenancyMode::Argument),
        "/mcp",
        r#"[{"jsonrpc":"2.0","method":"notifications/initialized"}]"#,
    )
    .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_none());
}

#[tokio::test]
async fn test_mixed_batch_answers_requests_only() {
    let (status, body) = post(
        app(TenancyMode::Argument),
        "/mcp",
        r#"[
            {"jsonrpc":"2.0","method":"notifications/initialized"},
            {"jsonrpc":"2.0","id":"x","method":"tools/list"}
        ]"#,
    )
    .await;
    let body = body.unwrap();

    assert_eq!(status, StatusCode::OK);
    let responses = body.as_array().unwrap();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["id"], "x");
    assert_eq!(responses[0]["result"]["tools"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_initialize_reports_server_info() {
    let (status, body) = post(
        app(TenancyMode::Argument),
        "/mcp",
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
    )
    .await;
    let body = body.unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["jsonrpc"], "2.0");
    assert_eq!(body["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(body["result"]["serverInfo"]["name"], "orgdocs-mcp");
    assert!(body["result"]["capabilities"]["tools"].is_object());
}

#[tokio::test]
async fn test_unknown_method_is_method_not_found() {
    let (_, body) = post(
        app(TenancyMode::Argument),
        "/mcp",
        r#"{"jsonrpc":"2.0","id":2,"method":"resources/list"}"#,
    )
    .await;
    let body = body.unwrap();

    assert_eq!(body["id"], 2);
    assert_eq!(body["error"]["code"], -32601);
    assert!(body["error"]["message"].as_str().unwrap().contains("resources/list"));
}

#[tokio::test]
async fn test_unknown_tool_is_tool_error() {
    let (_, body) = post(
        app(TenancyMode::Argument),
        "/mcp",
        r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"drop_docs","arguments":{"org":"acme"}}}"#,
    )
    .await;
    let body = body.unwrap();

    assert!(body.get("error").is_none());
    assert_eq!(body["result"]["isError"], true);
}

#[tokio::test]
async fn test_argument_mode_descriptor() {
    let (status, body) = get(app(TenancyMode::Argument), "/mcp").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "orgdocs-mcp");
    assert_eq!(body["tools"], json!(["list_docs", "get_doc", "search_docs"]));
    assert!(body.get("organization").is_none());
}

#[tokio::test]
async fn test_path_mode_descriptor_and_unknown_org() {
    let (status, body) = get(app(TenancyMode::Path), "/mcp/acme").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["organization"]["name"], "Acme Corp");
    assert_eq!(body["endpoint"], "/mcp/acme");

    let (status, _) = get(app(TenancyMode::Path), "/mcp/ghost").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = post(
        app(TenancyMode::Path),
        "/mcp/ghost",
        r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.unwrap()["error"]["code"], -32602);
}

#[tokio::test]
async fn test_path_mode_pins_organization() {
    let (status, body) = post(
        app(TenancyMode::Path),
        "/mcp/acme",
        r#"{"jsonrpc":"2.0","id":9,"method":"tools/call","params":{"name":"get_doc","arguments":{"slug":"intro"}}}"#,
    )
    .await;
    let body = body.unwrap();

    assert_eq!(status, StatusCode::OK);
    let text = body["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.starts_with("# Introduction"));
    assert!(text.contains("Welcome to Acme"));
}

#[tokio::test]
async fn test_healthz() {
    let (status, body) = get(app(TenancyMode::Argument), "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
