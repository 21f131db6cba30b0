/// Domain types for the documentation server
///
/// Organizations own documents; documents may point at a repository. Nothing
/// here talks to storage.

pub mod document;
pub mod types;

// Re-export public types for easy access
pub use document::*;
pub use types::*;
