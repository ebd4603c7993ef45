//! Dispatcher - routes an inbound tool call to its registered handler.
//!
//! Handlers never fail: validation, configuration and remote errors are
//! already error envelopes. The dispatcher only produces errors of its own
//! for an unknown tool name and for a handler that panicked.

use futures::FutureExt;
use rmcp::model::{CallToolResult, JsonObject};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::domains::komodo::ClientAccessor;

use super::error::ToolError;
use super::registry::ToolRegistry;

/// Routes calls through the registry, sharing one client accessor.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    accessor: Arc<ClientAccessor>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>, accessor: Arc<ClientAccessor>) -> Self {
        Self { registry, accessor }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Invoke the tool registered under `name`.
    ///
    /// Returns [`ToolError::NotFound`] without touching any handler when the
    /// name is unknown, and [`ToolError::Internal`] carrying the panic message
    /// when the handler panics.
    #[instrument(skip_all, fields(tool = %name))]
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, ToolError> {
        let Some(handler) = self.registry.handler(name) else {
            warn!("Unknown tool requested: {}", name);
            return Err(ToolError::not_found(name));
        };

        info!("Dispatching tool call: {}", name);
        let call = handler(arguments.unwrap_or_default(), self.accessor.clone());

        match AssertUnwindSafe(call).catch_unwind().await {
            Ok(result) => Ok(result),
            Err(panic) => {
                let message = panic_message(&*panic);
                error!("Tool {} panicked: {}", name, message);
                Err(ToolError::internal(message))
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_string()
    }
}
