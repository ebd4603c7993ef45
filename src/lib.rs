//! Komodo MCP Server Library
//!
//! Exposes the Komodo infrastructure-management API to MCP clients as a set
//! of tools. Every remote operation is available as its own tool, and each
//! domain also has a hub tool that selects the operation with an
//! `operation` argument.
//!
//! # Architecture
//!
//! - **core**: configuration, errors, the MCP protocol handler and transports
//! - **domains**: business logic organized by bounded contexts
//!   - **komodo**: the API client (`read` / `write` / `execute`) and its lazily built shared instance
//!   - **tools**: tool definitions, the registry, the dispatcher and result envelopes
//!
//! # Example
//!
//! ```rust,no_run
//! use komodo_mcp_server::{core::Config, core::McpServer, core::TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

pub use core::{Config, Error, McpServer, Result};
