/// Shared fixtures for the integration tests
use std::path::PathBuf;
use std::sync::Arc;

use orgdocs_mcp::*;

/// An in-memory store seeded with one organization
pub fn seeded_store(blob_root: Option<PathBuf>) -> (SqliteStore, Organization) {
    let store = SqliteStore::in_memory(blob_root).expect("Failed to create store");
    let org = Organization {
        id: OrganizationId::new(),
        name: "Acme Corp".to_string(),
        slug: "acme".to_string(),
    };
    store.create_organization(&org).expect("Failed to create organization");
    (store, org)
}

pub fn engine(store: SqliteStore, tenancy: TenancyMode) -> Arc<McpServer> {
    Arc::new(McpServer::new(
        Arc::new(store),
        Arc::new(ToolRegistry::new(tenancy)),
    ))
}
