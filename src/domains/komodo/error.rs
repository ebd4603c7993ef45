//! Komodo client error types.

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while talking to the Komodo API.
#[derive(Debug, Error)]
pub enum KomodoError {
    /// Connection settings are incomplete. Raised before any request is made.
    #[error(
        "Komodo credentials not configured. Please set KOMODO_URL, KOMODO_KEY, and KOMODO_SECRET environment variables (missing: {})",
        .missing.join(", ")
    )]
    Config { missing: Vec<&'static str> },

    /// The remote API rejected or failed the operation.
    #[error("{0}")]
    Remote(String),

    /// The request never produced a response (connection refused, DNS, TLS...).
    #[error("Request to Komodo failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body could not be decoded.
    #[error("Invalid response from Komodo: {0}")]
    Decode(String),
}

impl KomodoError {
    /// Create a configuration error listing the missing variables.
    pub fn config(missing: Vec<&'static str>) -> Self {
        Self::Config { missing }
    }

    /// Create a remote error with a plain message.
    pub fn remote(msg: impl Into<String>) -> Self {
        Self::Remote(msg.into())
    }

    /// Create a remote error from whatever body the API sent back.
    pub fn from_body(body: &Value) -> Self {
        Self::Remote(extract_message(body))
    }
}

/// Pull a human-readable message out of a remote error payload.
///
/// Tries, in order: the value itself when it is a string, then its
/// `message`, `error` and `data` fields, skipping any that are empty
/// (`null`, `""`, `false` or `0`). Anything else is rendered as JSON so the
/// operator still sees what came back.
pub fn extract_message(body: &Value) -> String {
    if let Value::String(text) = body {
        return text.clone();
    }

    if let Value::Object(map) = body {
        let found = ["message", "error", "data"]
            .into_iter()
            .filter_map(|key| map.get(key))
            .find(|value| !is_empty(value));
        match found {
            Some(Value::String(text)) => return text.clone(),
            Some(other) => return other.to_string(),
            None => {}
        }
    }

    body.to_string()
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::String(text) => text.is_empty(),
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::Array(_) | Value::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_plain_string() {
        assert_eq!(extract_message(&json!("boom")), "boom");
    }

    #[test]
    fn test_extract_message_field() {
        assert_eq!(extract_message(&json!({ "message": "not found" })), "not found");
    }

    #[test]
    fn test_extract_error_field() {
        assert_eq!(
            extract_message(&json!({ "error": "unauthorized", "trace": [] })),
            "unauthorized"
        );
        assert_eq!(
            extract_message(&json!({ "error": { "code": 7 } })),
            r#"{"code":7}"#
        );
    }

    #[test]
    fn test_extract_data_field() {
        assert_eq!(extract_message(&json!({ "data": "bad gateway" })), "bad gateway");
        assert_eq!(extract_message(&json!({ "data": [1, 2] })), "[1,2]");
    }

    #[test]
    fn test_extract_precedence() {
        let body = json!({ "data": "third", "error": "second", "message": "first" });
        assert_eq!(extract_message(&body), "first");

        let body = json!({ "message": null, "error": "second" });
        assert_eq!(extract_message(&body), "second");
    }

    #[test]
    fn test_extract_skips_empty_fields() {
        let body = json!({ "message": "", "error": "real cause" });
        assert_eq!(extract_message(&body), "real cause");

        let body = json!({ "message": false, "error": "real cause" });
        assert_eq!(extract_message(&body), "real cause");

        let body = json!({ "message": 0, "error": null, "data": "x" });
        assert_eq!(extract_message(&body), "x");

        let body = json!({ "message": "", "error": false });
        assert_eq!(extract_message(&body), body.to_string());
    }

    #[test]
    fn test_extract_fallback_stringifies() {
        assert_eq!(extract_message(&json!({ "status": 500 })), r#"{"status":500}"#);
        assert_eq!(extract_message(&json!(42)), "42");
    }

    #[test]
    fn test_config_error_lists_missing() {
        let err = KomodoError::config(vec!["KOMODO_KEY", "KOMODO_SECRET"]);
        let msg = err.to_string();
        assert!(msg.starts_with("Komodo credentials not configured"));
        assert!(msg.contains("missing: KOMODO_KEY, KOMODO_SECRET"));
    }
}
