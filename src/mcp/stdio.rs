/// Stdio transport
///
/// Newline-delimited JSON-RPC over stdin/stdout, the way desktop MCP clients
/// launch servers. Only protocol messages go to stdout.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use crate::mcp::protocol::{JsonRpcResponse, Reply};
use crate::mcp::registry::OrgScope;
use crate::mcp::McpServer;
use crate::ServerError;

/// Serve requests from stdin until it closes
pub async fn run(server: &McpServer, scope: &OrgScope) -> Result<(), ServerError> {
    info!("Starting MCP server on stdio, waiting for JSON-RPC requests...");
    let reader = BufReader::new(tokio::io::stdin());
    let writer = tokio::io::stdout();
    serve(server, scope, reader, writer).await
}

/// Line loop over any reader/writer pair
pub async fn serve<R, W>(
    server: &McpServer,
    scope: &OrgScope,
    mut reader: R,
    mut writer: W,
) -> Result<(), ServerError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();

    loop {
        line.clear();

        match reader.read_line(&mut line).await {
            Ok(0) => {
                info!("MCP server shutting down (stdin closed)");
                break;
            }
            Ok(_) => {
                let Some(output) = process_line(server, scope, &line).await? else {
                    continue;
                };

                writer.write_all(output.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;

                debug!("Sent response: {}", output);
            }
            Err(e) => {
                error!("Failed to read from stdin: {}", e);
                break;
            }
        }
    }

    Ok(())
}

/// Handle one line; `None` when there is nothing to write back
async fn process_line(
    server: &McpServer,
    scope: &OrgScope,
    line: &str,
) -> Result<Option<String>, ServerError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let message = match serde_json::from_str(line) {
        Ok(message) => message,
        Err(e) => {
            error!("Failed to parse JSON-RPC message: {}", e);
            return Ok(Some(serde_json::to_string(&JsonRpcResponse::parse_error())?));
        }
    };

    let output = match server.handle(message, scope).await {
        Reply::Single(response) => Some(serde_json::to_string(&response)?),
        Reply::Batch(responses) => Some(serde_json::to_string(&responses)?),
        Reply::Empty => None,
    };
    Ok(output)
}
