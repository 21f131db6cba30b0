/// Wire shapes of protocol types
use serde_json::json;

use orgdocs_mcp::mcp::protocol::*;
use orgdocs_mcp::mcp::registry::DocTool;
use orgdocs_mcp::{TenancyMode, ToolRegistry};

#[test]
fn test_tool_result_wire_shape() {
    let ok = serde_json::to_value(ToolCallResult::success("done")).unwrap();
    assert_eq!(ok, json!({"content": [{"type": "text", "text": "done"}]}));

    let failed = serde_json::to_value(ToolCallResult::error("boom")).unwrap();
    assert_eq!(failed["isError"], true);
    assert_eq!(failed["content"][0]["text"], "Error: boom");
}

#[test]
fn test_error_response_keeps_string_id() {
    let response = JsonRpcResponse::error(
        Some(json!("abc")),
        JsonRpcError::invalid_params("bad"),
    );
    let value = serde_json::to_value(response).unwrap();

    assert_eq!(value["id"], "abc");
    assert_eq!(value["error"]["code"], -32602);
    assert!(value.get("result").is_none());
}

#[test]
fn test_tools_call_without_params_is_invalid_params() {
    let err = McpMethod::parse("tools/call", None).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidParams);
}

#[test]
fn test_tool_names_round_trip() {
    for tool in DocTool::ALL {
        assert_eq!(DocTool::from_name(tool.name()), Some(tool));
    }
    assert_eq!(DocTool::from_name("ListDocs"), None);
}

#[test]
fn test_catalogue_has_descriptions_and_object_schemas() {
    let registry = ToolRegistry::new(TenancyMode::Path);
    let listed = serde_json::to_value(registry.definitions()).unwrap();

    for tool in listed.as_array().unwrap() {
        assert!(!tool["description"].as_str().unwrap().is_empty());
        assert_eq!(tool["inputSchema"]["type"], "object");
    }
}
