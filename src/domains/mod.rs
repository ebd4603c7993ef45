//! Domains module containing business logic organized by bounded contexts.
//!
//! - `komodo` - the remote API client and its shared accessor
//! - `tools` - MCP tool definitions, registry and dispatch

pub mod komodo;
pub mod tools;
