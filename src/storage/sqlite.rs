/// SQLite implementation of the document store
///
/// Holds a single connection behind a mutex. Queries are short and never
/// await while the lock is held.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::functions::FunctionFlags;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use crate::domain::{Document, Organization, OrganizationId, RepoId, Repository};
use crate::storage::{migrations, DocumentStore, FsBlobStore, StorageError};
use crate::tools::snippet::fold_case;

const DOCUMENT_COLUMNS: &str = "id, organization_id, slug, title, description, content, \
     blob_url, is_published, order_index, repository_id";

/// SQLite-based document store with optional filesystem blobs
pub struct SqliteStore {
    conn: Mutex<Connection>,
    blobs: Option<FsBlobStore>,
}

impl SqliteStore {
    /// Open (or create) the database file and bring the schema up to date
    pub fn new(db_path: PathBuf, blob_root: Option<PathBuf>) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let store = Self::from_connection(conn, blob_root)?;
        tracing::info!("SQLite document store initialized at: {:?}", db_path);
        Ok(store)
    }

    /// In-memory database, mostly useful for tests
    pub fn in_memory(blob_root: Option<PathBuf>) -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;
        Self::from_connection(conn, blob_root)
    }

    fn from_connection(conn: Connection, blob_root: Option<PathBuf>) -> Result<Self, StorageError> {
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        register_fold(&conn)?;
        migrations::initialize_database(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            blobs: blob_root.map(FsBlobStore::new),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Connection("connection lock poisoned".to_string()))
    }

    /// Insert a new organization
    pub fn create_organization(&self, org: &Organization) -> Result<(), StorageError> {
        self.conn()?.execute(
            "INSERT INTO organizations (id, name, slug) VALUES (?1, ?2, ?3)",
            params![org.id.to_string(), org.name, org.slug],
        )?;

        tracing::debug!("Created organization: {} ({})", org.slug, org.id);
        Ok(())
    }

    /// Insert a new repository reference
    pub fn create_repository(&self, repo: &Repository) -> Result<(), StorageError> {
        self.conn()?.execute(
            "INSERT INTO repositories (id, owner, name) VALUES (?1, ?2, ?3)",
            params![repo.id.to_string(), repo.owner, repo.name],
        )?;
        Ok(())
    }

    /// Insert a document, or replace the one with the same organization and slug
    ///
    /// On conflict the existing row keeps its id.
    pub fn upsert_document(&self, doc: &Document) -> Result<(), StorageError> {
        self.conn()?.execute(
            "INSERT INTO documents (
                id, organization_id, slug, title, description, content,
                blob_url, is_published, order_index, repository_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT (organization_id, slug) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                content = excluded.content,
                blob_url = excluded.blob_url,
                is_published = excluded.is_published,
                order_index = excluded.order_index,
                repository_id = excluded.repository_id",
            params![
                doc.id.to_string(),
                doc.organization_id.to_string(),
                doc.slug,
                doc.title,
                doc.description,
                doc.content,
                doc.blob_url,
                doc.is_published,
                doc.order_index,
                doc.repository_id.map(|id| id.to_string()),
            ],
        )?;

        tracing::debug!("Upserted document: {} in org {}", doc.slug, doc.organization_id);
        Ok(())
    }
}

/// Register `fold(text)`, the Unicode lowercase used by search
///
/// SQLite's own `lower()` only folds ASCII.
fn register_fold(conn: &Connection) -> Result<(), StorageError> {
    conn.create_scalar_function(
        "fold",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|text| fold_case(&text))),
    )
    .map_err(|e| StorageError::Connection(format!("Failed to register fold(): {}", e)))
}

/// Parse a UUID-backed id out of a TEXT column
fn id_column<T: std::str::FromStr>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    raw.parse().map_err(|_| {
        rusqlite::Error::InvalidColumnType(idx, "Invalid UUID".to_string(), rusqlite::types::Type::Text)
    })
}

fn organization_from_row(row: &Row<'_>) -> rusqlite::Result<Organization> {
    Ok(Organization {
        id: id_column(row, 0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
    })
}

fn document_from_row(row: &Row<'_>) -> rusqlite::Result<Document> {
    let repository_id = match row.get::<_, Option<String>>(9)? {
        Some(_) => Some(id_column(row, 9)?),
        None => None,
    };

    Ok(Document {
        id: id_column(row, 0)?,
        organization_id: id_column(row, 1)?,
        slug: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        content: row.get(5)?,
        blob_url: row.get(6)?,
        is_published: row.get(7)?,
        order_index: row.get(8)?,
        repository_id,
    })
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn find_organization_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Organization>, StorageError> {
        let conn = self.conn()?;
        let org = conn
            .query_row(
                "SELECT id, name, slug FROM organizations WHERE slug = ?1",
                params![slug],
                organization_from_row,
            )
            .optional()?;
        Ok(org)
    }

    async fn list_published_documents(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<Vec<Document>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM documents
             WHERE organization_id = ?1 AND is_published = 1
             ORDER BY order_index ASC, slug ASC",
            DOCUMENT_COLUMNS
        ))?;

        let docs = stmt
            .query_map(params![organization_id.to_string()], document_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(docs)
    }

    async fn get_published_document(
        &self,
        organization_id: &OrganizationId,
        slug: &str,
    ) -> Result<Option<Document>, StorageError> {
        let conn = self.conn()?;
        let doc = conn
            .query_row(
                &format!(
                    "SELECT {} FROM documents
                     WHERE organization_id = ?1 AND slug = ?2 AND is_published = 1",
                    DOCUMENT_COLUMNS
                ),
                params![organization_id.to_string(), slug],
                document_from_row,
            )
            .optional()?;
        Ok(doc)
    }

    async fn get_document_blob(
        &self,
        organization_id: &OrganizationId,
        slug: &str,
    ) -> Result<Option<String>, StorageError> {
        match &self.blobs {
            Some(blobs) => blobs.get(organization_id, slug).await,
            None => Ok(None),
        }
    }

    async fn search_published_documents(
        &self,
        organization_id: &OrganizationId,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Document>, StorageError> {
        // instr() takes the query as a plain bound value, so %, _ and \ are literal
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM documents
             WHERE organization_id = ?1 AND is_published = 1
               AND (instr(fold(title), fold(?2)) > 0
                    OR instr(fold(content), fold(?2)) > 0
                    OR instr(fold(coalesce(description, '')), fold(?2)) > 0)
             ORDER BY order_index ASC, slug ASC
             LIMIT ?3",
            DOCUMENT_COLUMNS
        ))?;

        let docs = stmt
            .query_map(params![organization_id.to_string(), query, limit], document_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(docs)
    }

    async fn resolve_repos(
        &self,
        ids: &[RepoId],
    ) -> Result<HashMap<RepoId, Repository>, StorageError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT id, owner, name FROM repositories WHERE id IN ({})",
            placeholders
        ))?;

        let repos = stmt
            .query_map(params_from_iter(ids.iter().map(|id| id.to_string())), |row| {
                Ok(Repository {
                    id: id_column(row, 0)?,
                    owner: row.get(1)?,
                    name: row.get(2)?,
                })
            })?
            .map(|repo| repo.map(|r| (r.id, r)))
            .collect::<Result<HashMap<_, _>, _>>()?;
        Ok(repos)
    }
}
