/// Storage layer for documentation data
///
/// The MCP core only reads through the `DocumentStore` trait. The bundled
/// implementation keeps rows in SQLite and content blobs on the filesystem.

pub mod blobs;
pub mod migrations;
pub mod sqlite;

// Re-export the main storage types
pub use blobs::FsBlobStore;
pub use sqlite::*;

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Document, Organization, OrganizationId, RepoId, Repository};

/// Maximum number of documents a search returns
pub const SEARCH_LIMIT: usize = 10;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Blob read error: {0}")]
    Blob(#[from] std::io::Error),

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Read interface the documentation tools query through
///
/// Every call is a single-shot operation with no retry. Lookups that find
/// nothing return `Ok(None)`; `Err` is reserved for the store itself failing.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Look up an organization by its URL slug
    async fn find_organization_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Organization>, StorageError>;

    /// All published documents of an organization, ordered by `order_index` ascending
    async fn list_published_documents(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<Vec<Document>, StorageError>;

    /// A single published document by slug
    async fn get_published_document(
        &self,
        organization_id: &OrganizationId,
        slug: &str,
    ) -> Result<Option<Document>, StorageError>;

    /// Blob content stored at `{orgId}/{slug}.md`, if any
    async fn get_document_blob(
        &self,
        organization_id: &OrganizationId,
        slug: &str,
    ) -> Result<Option<String>, StorageError>;

    /// Published documents whose title, content or description contains `query`
    /// (case-insensitive), ordered by `order_index` ascending, at most `limit`
    async fn search_published_documents(
        &self,
        organization_id: &OrganizationId,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Document>, StorageError>;

    /// Resolve repository references in one batched lookup
    async fn resolve_repos(
        &self,
        ids: &[RepoId],
    ) -> Result<HashMap<RepoId, Repository>, StorageError>;
}
