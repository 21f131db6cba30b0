/// The get_doc tool

use schemars::JsonSchema;
use serde::Deserialize;

use crate::domain::Organization;
use crate::storage::{DocumentStore, StorageError};

/// Arguments for get_doc
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetDocArgs {
    /// Slug of the document to fetch (from list_docs)
    pub slug: String,
}

/// Fetch one published document and render it with its full content
///
/// A blob stored at `{orgId}/{slug}.md` replaces the inline content entirely.
pub async fn get_doc(
    store: &dyn DocumentStore,
    org: &Organization,
    args: GetDocArgs,
) -> Result<String, StorageError> {
    let Some(doc) = store.get_published_document(&org.id, &args.slug).await? else {
        return Ok(format!(
            "Document '{}' not found in {}. Use list_docs to see available documents.",
            args.slug, org.name
        ));
    };

    let content = match store.get_document_blob(&org.id, &doc.slug).await {
        Ok(Some(blob)) => blob,
        Ok(None) => doc.content.clone(),
        Err(e) => {
            tracing::warn!("Blob read failed for {}/{}, using inline content: {}", org.slug, doc.slug, e);
            doc.content.clone()
        }
    };

    let repo_label = match doc.repository_id {
        Some(id) => store.resolve_repos(&[id]).await?.get(&id).map(|r| r.label()),
        None => None,
    };

    let mut header = format!("# {}\n\n**Organization:** {}", doc.title, org.name);
    if let Some(label) = repo_label {
        header.push_str(&format!("\n**Repository:** {}", label));
    }
    if let Some(description) = doc.description.as_deref().filter(|d| !d.is_empty()) {
        header.push_str(&format!("\n\n> {}", description));
    }

    Ok(format!("{}\n\n---\n\n{}", header, content))
}
