/// Main entry point for the organization documentation MCP server
///
/// This file sets up logging, parses command line arguments, and starts the
/// requested transport or runs an import.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use orgdocs_mcp::config::{self, ServerConfig, TenancyMode, DEFAULT_BIND};
use orgdocs_mcp::import::import_directory;
use orgdocs_mcp::{DocsServer, SqliteStore};

/// Command line arguments for the documentation MCP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long, global = true, env = "ORGDOCS_DATABASE")]
    database: Option<PathBuf>,

    /// Directory holding `{orgId}/{slug}.md` content blobs
    #[arg(long, global = true, env = "ORGDOCS_BLOB_DIR")]
    blob_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve MCP over HTTP
    Serve {
        /// Address to listen on
        #[arg(long, env = "ORGDOCS_BIND", default_value = DEFAULT_BIND)]
        bind: SocketAddr,

        /// How requests name their organization
        #[arg(long, env = "ORGDOCS_TENANCY", value_enum, default_value_t = TenancyMode::Argument)]
        tenancy: TenancyMode,
    },
    /// Serve MCP over stdin/stdout
    Stdio {
        /// Pin every call to this organization; otherwise tools take an `org` argument
        #[arg(long)]
        org: Option<String>,
    },
    /// Import a directory of markdown files as an organization's documentation
    Import {
        /// Organization slug
        #[arg(long)]
        org: String,

        /// Display name used when the organization is created
        #[arg(long)]
        name: Option<String>,

        /// Directory containing `*.md` files
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Set up logging based on command line flags
    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("orgdocs_mcp={}", log_level))
        .with_writer(std::io::stderr) // stdout is reserved for the stdio transport
        .init();

    // Determine database path
    let db_path = match args.database {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            path
        }
        None => config::default_database_path()?,
    };

    info!("Using database at: {}", db_path.display());

    let mut config = ServerConfig::new(db_path, args.blob_dir);

    match args.command {
        Command::Serve { bind, tenancy } => {
            config.bind = bind;
            config.tenancy = tenancy;
            DocsServer::new(config)?.run_http().await?;
        }
        Command::Stdio { org } => {
            config.tenancy = if org.is_some() {
                TenancyMode::Path
            } else {
                TenancyMode::Argument
            };
            DocsServer::new(config)?.run_stdio(org).await?;
        }
        Command::Import { org, name, dir } => {
            let store = SqliteStore::new(config.database, config.blob_dir)?;
            let name = name.unwrap_or_else(|| org.clone());
            let count = import_directory(&store, &org, &name, &dir).await?;
            eprintln!("Imported {} document(s) into '{}'", count, org);
        }
    }

    info!("Documentation MCP server shutdown complete");
    Ok(())
}
