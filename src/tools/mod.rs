/// Documentation tools exposed over MCP
///
/// Each tool takes an already-resolved organization, queries the document
/// store, and renders markdown for the calling model. Not-found outcomes are
/// ordinary text; only store failures come back as `Err`.

pub mod get;
pub mod list;
pub mod search;
pub mod snippet;

// Re-export tool functions for easy access
pub use get::*;
pub use list::*;
pub use search::*;
pub use snippet::snippet;
