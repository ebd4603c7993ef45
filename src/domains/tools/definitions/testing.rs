//! Helpers for running tool definitions against a recording client.

use rmcp::model::CallToolResult;
use serde_json::Value;
use std::sync::Arc;

use super::common::{OperationTool, execute_tool};
use crate::domains::komodo::ClientAccessor;
use crate::domains::komodo::testing::{RecordedCall, RecordingClient};
use crate::domains::tools::envelope;

/// Run tool `T` with `args` against `stub`.
pub async fn run<T: OperationTool>(stub: &Arc<RecordingClient>, args: Value) -> CallToolResult {
    let accessor = Arc::new(ClientAccessor::with_client(stub.clone()));
    let arguments = args.as_object().cloned().unwrap_or_default();
    execute_tool::<T>(arguments, accessor).await
}

/// Run `T` with `args` and return the single remote call it made.
pub async fn single_call<T: OperationTool>(args: Value) -> RecordedCall {
    let stub = RecordingClient::new();
    let result = run::<T>(&stub, args).await;
    assert_eq!(
        result.is_error,
        Some(false),
        "{} failed: {:?}",
        T::NAME,
        envelope::text_of(&result)
    );
    let mut calls = stub.calls();
    assert_eq!(calls.len(), 1, "{} made {} calls", T::NAME, calls.len());
    calls.remove(0)
}

/// Assert that two tools send the identical remote request.
pub async fn assert_same_call<A: OperationTool, B: OperationTool>(a_args: Value, b_args: Value) {
    let a = single_call::<A>(a_args).await;
    let b = single_call::<B>(b_args).await;
    assert_eq!(a, b, "{} and {} diverge", A::NAME, B::NAME);
}

/// Run `T` with `args`, expect an error envelope and no remote call.
pub async fn rejected<T: OperationTool>(args: Value) -> String {
    let stub = RecordingClient::new();
    let result = run::<T>(&stub, args).await;
    assert_eq!(result.is_error, Some(true), "{} accepted the input", T::NAME);
    assert!(stub.calls().is_empty(), "{} reached the client", T::NAME);
    envelope::text_of(&result).unwrap_or_default().to_string()
}

/// Structured payload of a success envelope.
pub fn payload(result: &CallToolResult) -> &Value {
    static NULL: Value = Value::Null;
    result.structured_content.as_ref().unwrap_or(&NULL)
}
