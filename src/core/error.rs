//! Error types and handling for the MCP server.
//!
//! This module defines the top-level error type that wraps failures from
//! every domain and from the transport layer.

use thiserror::Error;

use super::transport::TransportError;
use crate::domains::komodo::KomodoError;
use crate::domains::tools::ToolError;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the tools domain (e.g. duplicate tool names).
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// Error originating from the Komodo client.
    #[error("Komodo error: {0}")]
    Komodo(#[from] KomodoError),

    /// The transport failed to start or stopped with an error.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}
