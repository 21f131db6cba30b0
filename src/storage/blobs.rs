/// Filesystem-backed blob lookups
///
/// Blobs live under a root directory at `{root}/{orgId}/{slug}.md`.

use std::io::ErrorKind;
use std::path::PathBuf;

use crate::domain::{blob_key, OrganizationId};
use crate::storage::StorageError;

/// Reads document blobs from a directory tree
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Fetch the blob for a document, `None` if it doesn't exist
    pub async fn get(
        &self,
        organization_id: &OrganizationId,
        slug: &str,
    ) -> Result<Option<String>, StorageError> {
        if !is_safe_slug(slug) {
            tracing::debug!("Refusing blob lookup for unsafe slug {:?}", slug);
            return Ok(None);
        }

        let path = self.root.join(blob_key(organization_id, slug));
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Blob(e)),
        }
    }
}

/// Slugs must stay inside the organization's blob directory
fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('.')
        && !slug.contains(['/', '\\', '\0'])
}
