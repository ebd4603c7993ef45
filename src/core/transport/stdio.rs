//! STDIO transport implementation.
//!
//! Standard input/output transport for MCP - the default mode, used when an
//! MCP client launches the server as a subprocess. Logs go to stderr.

use rmcp::ServiceExt;
use tracing::info;

use super::{TransportError, TransportResult};
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Serve a single MCP session over stdin/stdout until the client closes it.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        info!(
            "Ready - serving {} tools via stdin/stdout",
            server.tools().len()
        );

        let service = server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| TransportError::init(e.to_string()))?;

        let reason = service
            .waiting()
            .await
            .map_err(|e| TransportError::service(e.to_string()))?;

        info!("STDIO session ended: {:?}", reason);
        Ok(())
    }
}
