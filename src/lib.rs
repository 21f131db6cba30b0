/// Public library interface for the organization documentation MCP server
///
/// This module exports the server implementation and the public types used by
/// the binary and the tests.

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;

pub mod config;
pub mod domain;
pub mod import;
pub mod mcp;
pub mod storage;
pub mod tools;

// Re-export public modules and types
pub use config::{ServerConfig, TenancyMode};
pub use domain::*;
pub use mcp::{McpServer, OrgScope, ToolRegistry};
pub use storage::{DocumentStore, SqliteStore, StorageError};

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Organization '{0}' not found")]
    OrganizationNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Documentation server: a document store behind the MCP engine
///
/// One instance serves either HTTP or stdio. The engine itself is stateless,
/// so the HTTP transport shares it across all connections.
pub struct DocsServer {
    config: ServerConfig,
    mcp: Arc<McpServer>,
}

impl DocsServer {
    /// Open the database and build the tool catalogue for the configured tenancy
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        tracing::info!("Initializing documentation server with database: {:?}", config.database);
        config.check();

        let store = SqliteStore::new(config.database.clone(), config.blob_dir.clone())?;
        let registry = Arc::new(ToolRegistry::new(config.tenancy));
        let mcp = Arc::new(McpServer::new(Arc::new(store), registry));

        Ok(Self { config, mcp })
    }

    /// Serve MCP over HTTP until Ctrl-C
    pub async fn run_http(self) -> Result<(), ServerError> {
        let listener = tokio::net::TcpListener::bind(self.config.bind).await?;
        let addr: SocketAddr = listener.local_addr()?;
        tracing::info!(
            "Listening on http://{} ({:?} tenancy)",
            addr,
            self.config.tenancy
        );

        let app = mcp::http::router(self.mcp);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Serve MCP over stdin/stdout
    ///
    /// With `org` the organization is pinned for the whole session and tool
    /// calls must not name one; without it every call carries an `org` argument.
    pub async fn run_stdio(self, org: Option<String>) -> Result<(), ServerError> {
        let scope = match org {
            Some(slug) => match self.mcp.resolve_organization(&slug).await? {
                Some(org) => {
                    if self.config.tenancy != TenancyMode::Path {
                        return Err(ServerError::Config(
                            "--org requires path tenancy".to_string(),
                        ));
                    }
                    OrgScope::Pinned(org)
                }
                None => return Err(ServerError::OrganizationNotFound(slug)),
            },
            None => {
                if self.config.tenancy == TenancyMode::Path {
                    return Err(ServerError::Config(
                        "path tenancy on stdio requires --org".to_string(),
                    ));
                }
                OrgScope::PerCall
            }
        };

        mcp::stdio::run(&self.mcp, &scope).await
    }

    /// The protocol engine (useful for testing)
    pub fn mcp_server(&self) -> Arc<McpServer> {
        Arc::clone(&self.mcp)
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
