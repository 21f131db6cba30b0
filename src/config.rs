/// Runtime configuration
///
/// Settings come from CLI flags and environment variables (see `main.rs`);
/// this module holds the resolved values and the default database location.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::Serialize;

/// Default HTTP bind address
pub const DEFAULT_BIND: &str = "127.0.0.1:8787";

/// How the target organization of a request is determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TenancyMode {
    /// Organization pinned by the URL path (`/mcp/{org}`) or `--org` on stdio
    Path,
    /// Every tool call names its organization with an `org` argument
    #[default]
    Argument,
}

/// Resolved settings for a server instance
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// SQLite database holding organizations and documents
    pub database: PathBuf,
    /// Root directory for `{orgId}/{slug}.md` content blobs
    pub blob_dir: Option<PathBuf>,
    pub bind: SocketAddr,
    pub tenancy: TenancyMode,
}

impl ServerConfig {
    pub fn new(database: PathBuf, blob_dir: Option<PathBuf>) -> Self {
        Self {
            database,
            blob_dir,
            bind: SocketAddr::from(([127, 0, 0, 1], 8787)),
            tenancy: TenancyMode::default(),
        }
    }

    /// Warn about settings that will silently degrade behavior
    pub fn check(&self) {
        if let Some(dir) = &self.blob_dir {
            if !dir.is_dir() {
                tracing::warn!(
                    "Blob directory {} does not exist; documents will use inline content",
                    dir.display()
                );
            }
        }
    }
}

/// Get the default database path with robust fallback strategy
pub fn default_database_path() -> std::io::Result<PathBuf> {
    // Try various locations in order of preference
    let potential_paths = [
        dirs::home_dir().map(|p| p.join(".orgdocs")),
        dirs::data_dir().map(|p| p.join("orgdocs")),
        dirs::config_dir().map(|p| p.join("orgdocs")),
        std::env::current_dir().ok().map(|p| p.join(".orgdocs")),
    ];

    for potential_path in potential_paths.iter().flatten() {
        if std::fs::create_dir_all(potential_path).is_ok() {
            // Test if we can write to this directory
            let test_file = potential_path.join(".test_write");
            if std::fs::write(&test_file, "test").is_ok() {
                let _ = std::fs::remove_file(&test_file);
                return Ok(potential_path.join("docs.db"));
            }
        }
    }

    // Ultimate fallback: use a temporary directory
    let temp_path = std::env::temp_dir().join("orgdocs");
    std::fs::create_dir_all(&temp_path)?;

    tracing::warn!("Using temporary directory for database: {}", temp_path.display());
    Ok(temp_path.join("docs.db"))
}
