/// The search_docs tool

use schemars::JsonSchema;
use serde::Deserialize;

use crate::domain::Organization;
use crate::storage::{DocumentStore, StorageError, SEARCH_LIMIT};
use crate::tools::snippet;

/// Arguments for search_docs
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchDocsArgs {
    /// Text to look for in titles, descriptions and content
    pub query: String,
}

/// Search published documents and render each match with a snippet
pub async fn search_docs(
    store: &dyn DocumentStore,
    org: &Organization,
    args: SearchDocsArgs,
) -> Result<String, StorageError> {
    let matches = store
        .search_published_documents(&org.id, &args.query, SEARCH_LIMIT)
        .await?;

    if matches.is_empty() {
        return Ok(format!("No results found for \"{}\" in {}.", args.query, org.name));
    }

    let blocks = matches
        .iter()
        .take(SEARCH_LIMIT)
        .map(|doc| {
            let excerpt = snippet(&doc.content, &args.query)
                .or_else(|| doc.description.clone())
                .unwrap_or_default();
            format!("## {}\nSlug: `{}`\n\n> {}", doc.title, doc.slug, excerpt)
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    Ok(format!(
        "Found {} result(s) for \"{}\":\n\n{}",
        matches.len().min(SEARCH_LIMIT),
        args.query,
        blocks
    ))
}
