//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating tool listing and tool calls to the tools domain.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/`, one module per Komodo
//! domain. The registry is built once from the configured
//! [`ToolMode`](super::config::ToolMode), and every call goes through the
//! [`Dispatcher`]. **Adding a new tool does NOT require modifying this file!**

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, model::*, service::RequestContext,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use super::error::Result;
use crate::domains::komodo::ClientAccessor;
use crate::domains::tools::{Dispatcher, ToolError, ToolRegistry};

const INSTRUCTIONS: &str = "This server exposes the Komodo API (servers, deployments, stacks, builds, repos, containers, variables, alerters, procedures, system). Read tools are safe to call freely; write and execute tools change the managed infrastructure.";

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp. It is cheap
/// to clone: every clone shares the same registry and Komodo client.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Routes tool calls to their handlers.
    dispatcher: Dispatcher,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    ///
    /// The Komodo client itself is not built here; it is created on the
    /// first tool call that needs it.
    pub fn new(config: Config) -> Result<Self> {
        let accessor = Arc::new(ClientAccessor::new(config.komodo.clone()));
        Self::with_accessor(config, accessor)
    }

    /// Create a server around an existing client accessor.
    pub fn with_accessor(config: Config, accessor: Arc<ClientAccessor>) -> Result<Self> {
        let registry = ToolRegistry::new(config.tools.mode)?;
        info!(
            "Registered {} tools (mode: {:?})",
            registry.len(),
            config.tools.mode
        );

        Ok(Self {
            config: Arc::new(config),
            dispatcher: Dispatcher::new(Arc::new(registry), accessor),
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Usage hints sent to clients on initialize.
    pub fn instructions(&self) -> &'static str {
        INSTRUCTIONS
    }

    // ========================================================================
    // Transport-neutral helpers (also used by the HTTP transport)
    // ========================================================================

    /// Definitions of every advertised tool, in registry order.
    pub fn tools(&self) -> Vec<Tool> {
        self.dispatcher.registry().definitions()
    }

    /// Call a tool by name.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> std::result::Result<CallToolResult, ToolError> {
        self.dispatcher.dispatch(name, arguments).await
    }
}

/// Map a dispatcher failure onto a protocol error.
///
/// Only unknown tools and panics reach this point; everything else is an
/// error envelope inside a successful result.
pub fn to_mcp_error(error: ToolError) -> McpError {
    match error {
        ToolError::NotFound(_) => McpError::new(ErrorCode::METHOD_NOT_FOUND, error.to_string(), None),
        other => McpError::internal_error(other.to_string(), None),
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[instrument(skip(self, _request, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        info!("Listing tools");
        Ok(ListToolsResult {
            tools: self.tools(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, request, _context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        self.dispatcher
            .dispatch(&request.name, request.arguments)
            .await
            .map_err(to_mcp_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ToolMode;
    use crate::domains::komodo::testing::RecordingClient;
    use serde_json::json;

    fn server(mode: ToolMode) -> (McpServer, Arc<RecordingClient>) {
        let stub = RecordingClient::new();
        let mut config = Config::default();
        config.tools.mode = mode;
        let accessor = Arc::new(ClientAccessor::with_client(stub.clone()));
        (McpServer::with_accessor(config, accessor).unwrap(), stub)
    }

    #[test]
    fn test_server_info() {
        let (server, _) = server(ToolMode::Operations);
        let info = server.get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_none());
        assert_eq!(info.server_info.name, "komodo-mcp-server");
        assert_eq!(server.name(), "komodo-mcp-server");
    }

    #[test]
    fn test_tools_follow_mode() {
        let (operations, _) = server(ToolMode::Operations);
        let (hubs, _) = server(ToolMode::Hub);
        let (all, _) = server(ToolMode::All);

        assert!(operations.tools().iter().all(|t| !t.name.ends_with("_ops")));
        assert!(hubs.tools().iter().all(|t| t.name.ends_with("_ops")));
        assert_eq!(
            all.tools().len(),
            operations.tools().len() + hubs.tools().len()
        );
    }

    #[tokio::test]
    async fn test_call_tool_reaches_client() {
        let (server, stub) = server(ToolMode::Hub);
        let result = server
            .call_tool(
                "komodo_stack_ops",
                json!({ "operation": "deploy", "stack_id": "web" })
                    .as_object()
                    .cloned(),
            )
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(false));
        let calls = stub.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].operation, "DeployStack");
    }

    #[test]
    fn test_error_codes() {
        let not_found = to_mcp_error(ToolError::not_found("missing_tool"));
        assert_eq!(not_found.code, ErrorCode::METHOD_NOT_FOUND);
        assert!(not_found.message.contains("missing_tool"));

        let panicked = to_mcp_error(ToolError::internal("boom"));
        assert_eq!(panicked.code, ErrorCode::INTERNAL_ERROR);
        assert!(panicked.message.contains("boom"));
    }
}
