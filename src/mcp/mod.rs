/// MCP protocol implementation
///
/// Handles the Model Context Protocol communication: JSON-RPC parsing, tool
/// routing, and the HTTP and stdio transports.

pub mod http;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod stdio;

// Re-export main types
pub use registry::{OrgScope, ToolRegistry};
pub use server::McpServer;
