/// Markdown directory importer
///
/// Loads a folder of `*.md` files into the store as the published
/// documentation of one organization.

use std::path::{Path, PathBuf};

use crate::domain::{Document, Organization, OrganizationId};
use crate::storage::{DocumentStore, SqliteStore};
use crate::ServerError;

/// Import every markdown file in `dir` for the organization `org_slug`
///
/// The organization is created with `org_name` if it doesn't exist yet. Files
/// are imported in file name order, which also becomes their `order_index`.
/// Returns the number of documents written.
pub async fn import_directory(
    store: &SqliteStore,
    org_slug: &str,
    org_name: &str,
    dir: &Path,
) -> Result<usize, ServerError> {
    let org = match store.find_organization_by_slug(org_slug).await? {
        Some(org) => org,
        None => {
            let org = Organization {
                id: OrganizationId::new(),
                name: org_name.to_string(),
                slug: org_slug.to_string(),
            };
            store.create_organization(&org)?;
            tracing::info!("Created organization {} ({})", org.slug, org.id);
            org
        }
    };

    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "md"))
        .collect();
    files.sort();

    let mut imported = 0;
    for (position, path) in files.iter().enumerate() {
        let Some(slug) = path.file_stem().and_then(|s| s.to_str()) else {
            tracing::warn!("Skipping file with non UTF-8 name: {}", path.display());
            continue;
        };

        let content = std::fs::read_to_string(path)?;
        let title = title_from_markdown(&content).unwrap_or(slug).to_string();
        let order_index = i64::try_from(position).unwrap_or(i64::MAX);

        store.upsert_document(&Document::new(org.id, slug, title, content, order_index))?;
        imported += 1;
    }

    tracing::info!("Imported {} document(s) into {}", imported, org.slug);
    Ok(imported)
}

/// First level-one heading, if any
fn title_from_markdown(content: &str) -> Option<&str> {
    content
        .lines()
        .find_map(|line| line.strip_prefix("# "))
        .map(str::trim)
        .filter(|title| !title.is_empty())
}
