/// The list_docs tool

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::Deserialize;

use crate::domain::{Organization, RepoId, Repository};
use crate::storage::{DocumentStore, StorageError};

/// Arguments for list_docs
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListDocsArgs {}

/// Render every published document of the organization as a markdown list
pub async fn list_docs(
    store: &dyn DocumentStore,
    org: &Organization,
) -> Result<String, StorageError> {
    let docs = store.list_published_documents(&org.id).await?;

    if docs.is_empty() {
        return Ok(format!("No documents found for {}.", org.name));
    }

    let mut repo_ids: Vec<RepoId> = docs.iter().filter_map(|d| d.repository_id).collect();
    repo_ids.sort_unstable_by_key(|id| id.0);
    repo_ids.dedup();

    let repos: HashMap<RepoId, Repository> = if repo_ids.is_empty() {
        HashMap::new()
    } else {
        store.resolve_repos(&repo_ids).await?
    };

    let entries = docs
        .iter()
        .map(|doc| {
            let mut line = format!("- **{}** (`{}`)", doc.title, doc.slug);
            if let Some(description) = doc.description.as_deref().filter(|d| !d.is_empty()) {
                line.push_str(&format!(": {}", description));
            }
            if let Some(repo) = doc.repository_id.and_then(|id| repos.get(&id)) {
                line.push_str(&format!(" [{}]", repo.label()));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n");

    Ok(format!(
        "# {} documentation\n\nFound {} document(s):\n\n{}",
        org.name,
        docs.len(),
        entries
    ))
}
