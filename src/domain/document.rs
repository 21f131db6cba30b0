/// Organizations, documents and the repositories they reference
///
/// These are read-only from the server's point of view. They are created and
/// published by external authoring flows; the MCP tools only ever see the
/// published subset.

use serde::{Deserialize, Serialize};
use crate::domain::{DocumentId, OrganizationId, RepoId};

/// An organization whose documentation is exposed through the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrganizationId,
    /// Display name (e.g., "Acme Corp")
    pub name: String,
    /// URL-safe unique lookup key (e.g., "acme")
    pub slug: String,
}

/// A source repository a document can be linked to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: RepoId,
    pub owner: String,
    pub name: String,
}

impl Repository {
    /// Human-readable `owner/name` label
    pub fn label(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// A single documentation page belonging to one organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub organization_id: OrganizationId,
    /// Unique within the organization
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    /// Inline markdown body. A blob stored at [`blob_key`] takes precedence.
    pub content: String,
    /// Durable blob reference recorded by the authoring flow
    pub blob_url: Option<String>,
    pub is_published: bool,
    /// Explicit ordering key, ascending
    pub order_index: i64,
    pub repository_id: Option<RepoId>,
}

impl Document {
    /// Create a published document with inline content and no extras
    pub fn new(
        organization_id: OrganizationId,
        slug: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        order_index: i64,
    ) -> Self {
        Self {
            id: DocumentId::new(),
            organization_id,
            slug: slug.into(),
            title: title.into(),
            description: None,
            content: content.into(),
            blob_url: None,
            is_published: true,
            order_index,
            repository_id: None,
        }
    }
}

/// Blob address for a document's content: `{orgId}/{slug}.md`
pub fn blob_key(organization_id: &OrganizationId, slug: &str) -> String {
    format!("{}/{}.md", organization_id, slug)
}
