//! Tools domain module.
//!
//! Every Komodo operation is exposed as an MCP tool. Each domain also has a
//! hub tool that takes an `operation` discriminator and reaches the same
//! remote calls.
//!
//! ## Architecture
//!
//! - `definitions/` - One module per Komodo domain (servers, stacks, ...)
//! - `registry.rs` - Name to definition and handler map, filtered by [`ToolMode`](crate::core::config::ToolMode)
//! - `dispatcher.rs` - Routes a call to its handler and contains panics
//! - `envelope.rs` - Success and error result builders
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Add the operation to the domain's `XOp` enum and its `into_call()`
//! 2. Implement [`OperationTool`](definitions::OperationTool) for a unit struct
//! 3. Export it in `definitions/mod.rs`
//! 4. Add `ToolEntry::of::<YourTool>()` to `registry.rs`
//!
//! Transports never change: they only see the dispatcher.

pub mod definitions;
mod dispatcher;
pub mod envelope;
mod error;
mod registry;

pub use dispatcher::Dispatcher;
pub use error::ToolError;
pub use registry::{ToolEntry, ToolHandler, ToolRegistry};
