//! Recording stand-in for the Komodo API, used by unit tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::client::{KomodoApi, Verb};
use super::error::KomodoError;

/// One call received by [`RecordingClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub verb: Verb,
    pub operation: String,
    pub params: Value,
}

/// A [`KomodoApi`] that records every call and replays queued results.
///
/// When the queue is empty it answers `{"ok": true}`.
#[derive(Default)]
pub struct RecordingClient {
    calls: Mutex<Vec<RecordedCall>>,
    replies: Mutex<VecDeque<Result<Value, KomodoError>>>,
}

impl RecordingClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Stub whose first call returns `value`.
    pub fn returning(value: Value) -> Arc<Self> {
        let stub = Self::new();
        stub.push(Ok(value));
        stub
    }

    /// Stub whose first call fails with `error`.
    pub fn failing(error: KomodoError) -> Arc<Self> {
        let stub = Self::new();
        stub.push(Err(error));
        stub
    }

    pub fn push(&self, reply: Result<Value, KomodoError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, verb: Verb, operation: &str, params: Value) -> Result<Value, KomodoError> {
        self.calls.lock().unwrap().push(RecordedCall {
            verb,
            operation: operation.to_string(),
            params,
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(serde_json::json!({ "ok": true })))
    }
}

#[async_trait]
impl KomodoApi for RecordingClient {
    async fn read(&self, operation: &str, params: Value) -> Result<Value, KomodoError> {
        self.record(Verb::Read, operation, params)
    }

    async fn write(&self, operation: &str, params: Value) -> Result<Value, KomodoError> {
        self.record(Verb::Write, operation, params)
    }

    async fn execute(&self, operation: &str, params: Value) -> Result<Value, KomodoError> {
        self.record(Verb::Execute, operation, params)
    }
}
