/// End-to-end tool behavior through the protocol engine
use serde_json::{json, Value};

use orgdocs_mcp::mcp::protocol::Reply;
use orgdocs_mcp::*;

use super::common::{engine, seeded_store};

async fn call_tool(server: &McpServer, scope: &OrgScope, name: &str, arguments: Value) -> Value {
    let request = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "tools/call",
        "params": {"name": name, "arguments": arguments}
    });
    match server.handle(request, scope).await {
        Reply::Single(response) => serde_json::to_value(response).unwrap(),
        other => panic!("expected a single response, got {:?}", other),
    }
}

fn text(response: &Value) -> &str {
    response["result"]["content"][0]["text"].as_str().unwrap()
}

#[tokio::test]
async fn test_list_docs_orders_by_index_and_names_repos() {
    let (store, org) = seeded_store(None);
    let repo = Repository {
        id: RepoId::new(),
        owner: "acme".to_string(),
        name: "widgets".to_string(),
    };
    store.create_repository(&repo).unwrap();

    let mut api = Document::new(org.id, "api", "API Reference", "Endpoints", 2);
    api.description = Some("Every endpoint".to_string());
    api.repository_id = Some(repo.id);
    let mut draft = Document::new(org.id, "draft", "Draft", "Not yet", 0);
    draft.is_published = false;

    store.upsert_document(&api).unwrap();
    store.upsert_document(&Document::new(org.id, "intro", "Introduction", "Hi", 1)).unwrap();
    store.upsert_document(&draft).unwrap();

    let server = engine(store, TenancyMode::Argument);
    let response = call_tool(&server, &OrgScope::PerCall, "list_docs", json!({"org": "acme"})).await;
    let text = text(&response);

    assert!(text.starts_with("# Acme Corp documentation"));
    assert!(text.contains("Found 2 document(s)"));
    assert!(!text.contains("Draft"));
    let intro = text.find("Introduction").unwrap();
    let api = text.find("API Reference").unwrap();
    assert!(intro < api);
    assert!(text.contains("- **API Reference** (`api`): Every endpoint [acme/widgets]"));
}

#[tokio::test]
async fn test_list_docs_for_empty_organization() {
    let (store, org) = seeded_store(None);
    let server = engine(store, TenancyMode::Path);

    let response = call_tool(&server, &OrgScope::Pinned(org), "list_docs", json!({})).await;
    assert_eq!(text(&response), "No documents found for Acme Corp.");
    assert!(response["result"].get("isError").is_none());
}

#[tokio::test]
async fn test_get_doc_prefers_blob_content() {
    let blobs = tempfile::tempdir().unwrap();
    let (store, org) = seeded_store(Some(blobs.path().to_path_buf()));
    store
        .upsert_document(&Document::new(org.id, "guide", "Guide", "inline body", 0))
        .unwrap();
    store
        .upsert_document(&Document::new(org.id, "faq", "FAQ", "inline faq", 1))
        .unwrap();

    let org_dir = blobs.path().join(org.id.to_string());
    std::fs::create_dir_all(&org_dir).unwrap();
    std::fs::write(org_dir.join("guide.md"), "blob body").unwrap();

    let server = engine(store, TenancyMode::Path);
    let scope = OrgScope::Pinned(org);

    let guide = call_tool(&server, &scope, "get_doc", json!({"slug": "guide"})).await;
    assert!(text(&guide).ends_with("---\n\nblob body"));
    assert!(!text(&guide).contains("inline body"));

    let faq = call_tool(&server, &scope, "get_doc", json!({"slug": "faq"})).await;
    assert!(text(&faq).ends_with("inline faq"));
}

#[tokio::test]
async fn test_get_doc_missing_is_not_an_error() {
    let (store, org) = seeded_store(None);
    let server = engine(store, TenancyMode::Path);

    let response = call_tool(&server, &OrgScope::Pinned(org), "get_doc", json!({"slug": "nope"})).await;
    assert!(text(&response).contains("Document 'nope' not found in Acme Corp"));
    assert!(response["result"].get("isError").is_none());
}

#[tokio::test]
async fn test_search_caps_results_at_ten() {
    let (store, org) = seeded_store(None);
    for i in 0..12 {
        let doc = Document::new(
            org.id,
            format!("page-{:02}", i),
            format!("Page {}", i),
            "all about deployment",
            i,
        );
        store.upsert_document(&doc).unwrap();
    }
    let server = engine(store, TenancyMode::Path);

    let response = call_tool(
        &server,
        &OrgScope::Pinned(org),
        "search_docs",
        json!({"query": "DEPLOYMENT"}),
    )
    .await;
    let text = text(&response);

    assert!(text.starts_with("Found 10 result(s) for \"DEPLOYMENT\""));
    assert_eq!(text.matches("## Page").count(), 10);
    assert!(text.contains("Slug: `page-09`"));
    assert!(!text.contains("page-10"));
}

#[tokio::test]
async fn test_search_matches_wildcards_literally() {
    let (store, org) = seeded_store(None);
    store
        .upsert_document(&Document::new(org.id, "rates", "Rates", "Discount of 50% applies", 0))
        .unwrap();
    store
        .upsert_document(&Document::new(org.id, "other", "Other", "Nothing to see", 1))
        .unwrap();
    let server = engine(store, TenancyMode::Path);
    let scope = OrgScope::Pinned(org);

    let hit = call_tool(&server, &scope, "search_docs", json!({"query": "50%"})).await;
    assert!(text(&hit).contains("Found 1 result(s)"));

    let percent = call_tool(&server, &scope, "search_docs", json!({"query": "%"})).await;
    assert!(text(&percent).contains("Found 1 result(s)"));

    let none = call_tool(&server, &scope, "search_docs", json!({"query": "_x_"})).await;
    assert_eq!(text(&none), "No results found for \"_x_\" in Acme Corp.");
}

#[tokio::test]
async fn test_search_is_case_insensitive_beyond_ascii() {
    let (store, org) = seeded_store(None);
    store
        .upsert_document(&Document::new(org.id, "cv", "Lebenslauf", "Mein Résumé für Über-Teams", 0))
        .unwrap();
    let server = engine(store, TenancyMode::Path);
    let scope = OrgScope::Pinned(org);

    let upper = call_tool(&server, &scope, "search_docs", json!({"query": "RÉSUMÉ"})).await;
    assert!(text(&upper).starts_with("Found 1 result(s) for \"RÉSUMÉ\""));
    assert!(text(&upper).contains("> Mein Résumé für Über-Teams"));

    let lower = call_tool(&server, &scope, "search_docs", json!({"query": "über"})).await;
    assert!(text(&lower).starts_with("Found 1 result(s)"));
}

#[tokio::test]
async fn test_search_snippet_falls_back_when_content_does_not_match() {
    let (store, org) = seeded_store(None);
    let mut described = Document::new(org.id, "billing", "Billing FAQ", "Invoices go out monthly.", 0);
    described.description = Some("Answers about payments".to_string());
    store.upsert_document(&described).unwrap();
    store
        .upsert_document(&Document::new(org.id, "billing-api", "Billing API", "Endpoints only.", 1))
        .unwrap();
    let server = engine(store, TenancyMode::Path);

    let response = call_tool(&server, &OrgScope::Pinned(org), "search_docs", json!({"query": "billing"})).await;
    let text = text(&response);

    assert!(text.starts_with("Found 2 result(s)"));
    assert!(text.contains("## Billing FAQ\nSlug: `billing`\n\n> Answers about payments"));
    assert!(text.ends_with("## Billing API\nSlug: `billing-api`\n\n> "));
}

#[tokio::test]
async fn test_argument_mode_unknown_org() {
    let (store, _) = seeded_store(None);
    let server = engine(store, TenancyMode::Argument);

    let response = call_tool(&server, &OrgScope::PerCall, "search_docs", json!({"org": "ghost", "query": "x"})).await;
    assert_eq!(text(&response), "Organization 'ghost' not found.");
}
