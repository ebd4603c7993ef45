//! Tool-specific error types.

use thiserror::Error;

use crate::domains::komodo::KomodoError;

/// Errors that can occur while registering, validating or running tools.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Unknown tool: {0}")]
    NotFound(String),

    /// Arguments could not be decoded into the tool's parameters.
    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },

    /// A hub operation was selected without the fields it needs.
    #[error("{} required for {operation} operation", describe_fields(.fields))]
    MissingFields {
        operation: String,
        fields: Vec<String>,
    },

    /// Two tools were registered under the same name.
    #[error("Duplicate tool name: {0}")]
    DuplicateTool(String),

    /// Configuration or remote failure from the Komodo client.
    #[error(transparent)]
    Komodo(#[from] KomodoError),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    /// Build a missing-fields error from `(field, is_missing)` pairs.
    pub fn missing<I, F>(operation: impl Into<String>, checks: I) -> Self
    where
        I: IntoIterator<Item = (F, bool)>,
        F: Into<String>,
    {
        Self::MissingFields {
            operation: operation.into(),
            fields: checks
                .into_iter()
                .filter(|(_, missing)| *missing)
                .map(|(field, _)| field.into())
                .collect(),
        }
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Render `["a", "b"]` as "`a`, `b` are" and `["a"]` as "`a` is".
fn describe_fields(fields: &[String]) -> String {
    let listed = fields
        .iter()
        .map(|f| format!("`{f}`"))
        .collect::<Vec<_>>()
        .join(", ");
    let verb = if fields.len() == 1 { "is" } else { "are" };
    format!("{listed} {verb}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_single_field() {
        let err = ToolError::missing("get", [("server_id", true)]);
        assert_eq!(err.to_string(), "`server_id` is required for get operation");
    }

    #[test]
    fn test_missing_only_lists_absent_fields() {
        let err = ToolError::missing(
            "create",
            [("name", true), ("server_id", false), ("image", true)],
        );
        assert_eq!(err.to_string(), "`name`, `image` are required for create operation");
    }

    #[test]
    fn test_komodo_error_is_transparent() {
        let err = ToolError::from(KomodoError::remote("not found"));
        assert_eq!(err.to_string(), "not found");
    }

    #[test]
    fn test_invalid_arguments_names_tool() {
        let err = ToolError::invalid_arguments("create_server", "missing field `name`");
        assert_eq!(
            err.to_string(),
            "Invalid arguments for create_server: missing field `name`"
        );
    }
}
