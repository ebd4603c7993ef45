//! Response envelopes.
//!
//! Every tool answers with one of two shapes:
//! - success: the payload as pretty-printed JSON text plus the same payload
//!   as `structuredContent`
//! - error: `"Error: <message>"` text with `isError: true`

use rmcp::model::{CallToolResult, Content, RawContent};
use serde_json::Value;
use tracing::warn;

/// Wrap a payload into a success result.
pub fn success(payload: Value) -> CallToolResult {
    let text = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
    CallToolResult {
        content: vec![Content::text(text)],
        structured_content: Some(payload),
        is_error: Some(false),
        meta: None,
    }
}

/// Wrap an error message into an error result.
pub fn error(message: impl std::fmt::Display) -> CallToolResult {
    let message = message.to_string();
    warn!("Tool returned error: {}", message);
    CallToolResult::error(vec![Content::text(format!("Error: {}", message))])
}

/// Text of the first content block, if it is text.
pub fn text_of(result: &CallToolResult) -> Option<&str> {
    result
        .content
        .first()
        .and_then(|c| match &c.raw {
            RawContent::Text(text) => Some(text.text.as_str()),
            _ => None,
        })
}
