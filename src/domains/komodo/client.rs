//! Komodo API client.
//!
//! The Komodo core exposes every operation through three POST endpoints,
//! `/read`, `/write` and `/execute`, each taking `{ "type": <Operation>,
//! "params": { ... } }`. [`KomodoApi`] is the seam the tools talk to;
//! [`KomodoClient`] is the HTTP implementation.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::KomodoError;

/// The three request categories the Komodo API distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    /// Idempotent query (list, get, inspect).
    Read,
    /// Persisted mutation (create, update, delete, rename).
    Write,
    /// Side-effecting lifecycle action (deploy, start, stop, run...).
    Execute,
}

impl Verb {
    /// Endpoint path segment for this verb.
    pub fn path(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Execute => "execute",
        }
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Remote primitives of the Komodo API.
#[async_trait]
pub trait KomodoApi: Send + Sync {
    /// Run an idempotent query.
    async fn read(&self, operation: &str, params: Value) -> Result<Value, KomodoError>;

    /// Run a persisted mutation.
    async fn write(&self, operation: &str, params: Value) -> Result<Value, KomodoError>;

    /// Run a side-effecting action.
    async fn execute(&self, operation: &str, params: Value) -> Result<Value, KomodoError>;

    /// Route to the primitive matching `verb`.
    async fn call(&self, verb: Verb, operation: &str, params: Value) -> Result<Value, KomodoError> {
        match verb {
            Verb::Read => self.read(operation, params).await,
            Verb::Write => self.write(operation, params).await,
            Verb::Execute => self.execute(operation, params).await,
        }
    }
}

/// HTTP client for a Komodo core, authenticated with an API key pair.
#[derive(Clone)]
pub struct KomodoClient {
    base_url: String,
    key: String,
    secret: String,
    http: reqwest::Client,
}

impl KomodoClient {
    /// Create a client for the core at `url`.
    pub fn new(url: impl Into<String>, key: impl Into<String>, secret: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            base_url: url.trim_end_matches('/').to_string(),
            key: key.into(),
            secret: secret.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, verb: Verb) -> String {
        format!("{}/{}", self.base_url, verb.path())
    }

    async fn send(&self, verb: Verb, operation: &str, params: Value) -> Result<Value, KomodoError> {
        let url = self.endpoint(verb);
        debug!("Komodo {} {} -> {}", verb, operation, url);

        let response = self
            .http
            .post(&url)
            .header("X-Api-Key", &self.key)
            .header("X-Api-Secret", &self.secret)
            .json(&request_body(operation, params))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let result = decode_response(status, &body);
        if let Err(e) = &result {
            warn!("Komodo {} {} failed ({}): {}", verb, operation, status, e);
        }
        result
    }
}

impl std::fmt::Debug for KomodoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KomodoClient")
            .field("base_url", &self.base_url)
            .field("key", &"[REDACTED]")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl KomodoApi for KomodoClient {
    async fn read(&self, operation: &str, params: Value) -> Result<Value, KomodoError> {
        self.send(Verb::Read, operation, params).await
    }

    async fn write(&self, operation: &str, params: Value) -> Result<Value, KomodoError> {
        self.send(Verb::Write, operation, params).await
    }

    async fn execute(&self, operation: &str, params: Value) -> Result<Value, KomodoError> {
        self.send(Verb::Execute, operation, params).await
    }
}

/// Build the JSON body for a request.
fn request_body(operation: &str, params: Value) -> Value {
    serde_json::json!({
        "type": operation,
        "params": params,
    })
}

/// Turn a raw response into a result value or a remote error.
fn decode_response(status: StatusCode, body: &str) -> Result<Value, KomodoError> {
    let trimmed = body.trim();

    if status.is_success() {
        if trimmed.is_empty() {
            return Ok(Value::Null);
        }
        return serde_json::from_str(trimmed).map_err(|e| KomodoError::Decode(e.to_string()));
    }

    if trimmed.is_empty() {
        return Err(KomodoError::remote(status.to_string()));
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => Err(KomodoError::from_body(&value)),
        Err(_) => Err(KomodoError::remote(trimmed)),
    }
}
