//! Common building blocks shared by every Komodo tool.
//!
//! A tool is a unit struct implementing [`OperationTool`]: static metadata,
//! a typed `Params` struct (its JSON schema is the tool's `inputSchema`),
//! and a pure [`OperationTool::plan`] turning params into one [`RemoteCall`].
//! [`execute_tool`] drives the rest: decode, plan, fetch the shared client,
//! send, wrap.

use rmcp::{
    handler::server::tool::schema_for_type,
    model::{CallToolResult, JsonObject, Tool, ToolAnnotations},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::{debug, info};

use crate::domains::komodo::{ClientAccessor, KomodoApi, KomodoError, Verb};
use crate::domains::tools::{envelope, error::ToolError};

// ============================================================================
// Remote call plan
// ============================================================================

/// Exactly one request to the Komodo API, plus how to shape its reply.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteCall {
    pub verb: Verb,
    pub operation: &'static str,
    pub params: Value,
    pub reply: Reply,
}

/// Shape of the success payload built around the remote result.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// Key the remote result is stored under.
    pub key: &'static str,
    /// Confirmation naming the affected entity, for mutations.
    pub message: Option<String>,
}

impl RemoteCall {
    fn new(verb: Verb, operation: &'static str, params: Value) -> Self {
        Self {
            verb,
            operation,
            params,
            reply: Reply {
                key: "result",
                message: None,
            },
        }
    }

    pub fn read(operation: &'static str, params: Value) -> Self {
        Self::new(Verb::Read, operation, params)
    }

    pub fn write(operation: &'static str, params: Value) -> Self {
        Self::new(Verb::Write, operation, params)
    }

    /// Lifecycle actions answer with a Komodo `Update`, stored under `update`.
    pub fn execute(operation: &'static str, params: Value) -> Self {
        Self::new(Verb::Execute, operation, params).reply("update")
    }

    /// Store the remote result under `key`.
    pub fn reply(mut self, key: &'static str) -> Self {
        self.reply.key = key;
        self
    }

    /// Attach a confirmation message to the payload.
    pub fn confirm(mut self, message: impl Into<String>) -> Self {
        self.reply.message = Some(message.into());
        self
    }

    /// Send the request and build the success payload.
    pub async fn send(self, client: &dyn KomodoApi) -> Result<Value, KomodoError> {
        debug!("Remote {} {} {}", self.verb, self.operation, self.params);
        let result = client.call(self.verb, self.operation, self.params).await?;

        let mut payload = Map::new();
        payload.insert(self.reply.key.to_string(), result);
        if let Some(message) = self.reply.message {
            payload.insert("message".to_string(), Value::String(message));
        }
        Ok(Value::Object(payload))
    }
}

/// Serialize a typed request body.
pub fn to_params<T: Serialize>(value: &T) -> Result<Value, ToolError> {
    serde_json::to_value(value).map_err(|e| ToolError::internal(e.to_string()))
}

// ============================================================================
// Tool metadata
// ============================================================================

/// Declared success payload of a per-operation tool (its `outputSchema`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Output {
    pub key: &'static str,
    pub list: bool,
    pub confirmed: bool,
}

impl Output {
    /// `{ key: [...] }`
    pub const fn list(key: &'static str) -> Self {
        Self {
            key,
            list: true,
            confirmed: false,
        }
    }

    /// `{ key: <any> }`
    pub const fn item(key: &'static str) -> Self {
        Self {
            key,
            list: false,
            confirmed: false,
        }
    }

    /// `{ key: <any>, message: <string> }`
    pub const fn confirmed(key: &'static str) -> Self {
        Self {
            key,
            list: false,
            confirmed: true,
        }
    }

    /// `{ update: <any> }`, the reply of every lifecycle action.
    pub const UPDATE: Self = Self::item("update");

    /// `{ result: <any>, message: <string> }`, the reply of every delete.
    pub const DELETED: Self = Self::confirmed("result");

    /// JSON schema of this payload.
    pub fn schema(&self) -> Arc<JsonObject> {
        let value_schema = if self.list {
            json!({ "type": "array", "items": {} })
        } else {
            json!({})
        };

        let mut properties = Map::new();
        properties.insert(self.key.to_string(), value_schema);
        let mut required = vec![Value::String(self.key.to_string())];

        if self.confirmed {
            properties.insert("message".to_string(), json!({ "type": "string" }));
            required.push(Value::String("message".to_string()));
        }

        let mut schema = Map::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        schema.insert("required".to_string(), Value::Array(required));
        Arc::new(schema)
    }
}

/// Behaviour hints advertised as MCP tool annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hints {
    pub read_only: bool,
    pub destructive: bool,
    pub idempotent: bool,
}

impl Hints {
    /// Queries.
    pub const READ: Self = Self {
        read_only: true,
        destructive: false,
        idempotent: true,
    };

    /// Creates, updates and lifecycle actions.
    pub const MUTATING: Self = Self {
        read_only: false,
        destructive: false,
        idempotent: false,
    };

    /// Deletes, destroys, and hubs that can do either.
    pub const DESTRUCTIVE: Self = Self {
        read_only: false,
        destructive: true,
        idempotent: false,
    };

    pub fn annotations(self, title: &str) -> ToolAnnotations {
        ToolAnnotations {
            title: Some(title.to_string()),
            read_only_hint: Some(self.read_only),
            destructive_hint: Some(self.destructive),
            idempotent_hint: Some(self.idempotent),
            open_world_hint: Some(true),
        }
    }
}

/// Parameters of tools that take none.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct NoParams {}

// ============================================================================
// Tool definition
// ============================================================================

/// A Komodo tool: metadata plus a pure planning step.
pub trait OperationTool: 'static {
    /// Tool name as registered in MCP.
    const NAME: &'static str;

    /// Short human title.
    const TITLE: &'static str;

    /// Tool description shown to clients.
    const DESCRIPTION: &'static str;

    const HINTS: Hints;

    /// Declared reply shape, if advertised.
    const OUTPUT: Option<Output> = None;

    /// Required string arguments allowed to be empty.
    const ALLOW_BLANK: &'static [&'static str] = &[];

    type Params: DeserializeOwned + JsonSchema + Send + 'static;

    /// Validate params and describe the single remote call to make.
    fn plan(params: Self::Params) -> Result<RemoteCall, ToolError>;

    /// Create a Tool model for this tool (metadata).
    fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            title: Some(Self::TITLE.into()),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<Self::Params>().into(),
            output_schema: Self::OUTPUT.map(|output| output.schema()),
            annotations: Some(Self::HINTS.annotations(Self::TITLE)),
            icons: None,
            meta: None,
        }
    }
}

/// Decode `arguments`, plan, and send through the shared client.
///
/// Never fails: every error becomes an error envelope. Invalid input never
/// reaches the client accessor.
pub async fn execute_tool<T: OperationTool>(
    arguments: JsonObject,
    accessor: Arc<ClientAccessor>,
) -> CallToolResult {
    info!("Tool called: {}", T::NAME);
    match try_execute::<T>(arguments, &accessor).await {
        Ok(payload) => envelope::success(payload),
        Err(e) => envelope::error(e),
    }
}

async fn try_execute<T: OperationTool>(
    arguments: JsonObject,
    accessor: &ClientAccessor,
) -> Result<Value, ToolError> {
    reject_blank::<T>(&arguments)?;
    let params: T::Params = serde_json::from_value(Value::Object(arguments))
        .map_err(|e| ToolError::invalid_arguments(T::NAME, e.to_string()))?;
    let call = T::plan(params)?;
    let client = accessor.get()?;
    Ok(call.send(&*client).await?)
}

// ============================================================================
// Field helpers
// ============================================================================

/// Reject blank values for the required string arguments of `T`.
///
/// Same rule as the hub checks in [`require`], applied to per-operation
/// tools before decoding.
fn reject_blank<T: OperationTool>(arguments: &JsonObject) -> Result<(), ToolError> {
    let schema = schema_for_type::<T::Params>();
    let Some(required) = schema.get("required").and_then(Value::as_array) else {
        return Ok(());
    };

    let blank: Vec<&str> = required
        .iter()
        .filter_map(Value::as_str)
        .filter(|field| !T::ALLOW_BLANK.iter().any(|allowed| allowed == field))
        .filter(|field| {
            matches!(arguments.get(*field), Some(Value::String(v)) if v.trim().is_empty())
        })
        .collect();

    if blank.is_empty() {
        Ok(())
    } else {
        Err(ToolError::missing(T::NAME, blank.into_iter().map(|field| (field, true))))
    }
}

/// Treat blank strings as absent.
pub fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Require a single hub field.
pub fn require(
    operation: &'static str,
    field: &'static str,
    value: Option<String>,
) -> Result<String, ToolError> {
    present(value).ok_or_else(|| ToolError::missing(operation, [(field, true)]))
}

/// Require several hub fields at once, reporting every missing one.
pub fn require_all<const N: usize>(
    operation: &'static str,
    fields: [(&'static str, Option<String>); N],
) -> Result<[String; N], ToolError> {
    let fields = fields.map(|(name, value)| (name, present(value)));
    if fields.iter().any(|(_, value)| value.is_none()) {
        return Err(ToolError::missing(
            operation,
            fields.iter().map(|(name, value)| (*name, value.is_none())),
        ));
    }
    Ok(fields.map(|(_, value)| value.unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::komodo::testing::RecordingClient;

    #[test]
    fn test_output_schema_list() {
        let schema = Output::list("servers").schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["servers"]["type"], "array");
        assert_eq!(schema["required"], json!(["servers"]));
    }

    #[test]
    fn test_output_schema_confirmed() {
        let schema = Output::DELETED.schema();
        assert!(schema["properties"].get("result").is_some());
        assert_eq!(schema["properties"]["message"]["type"], "string");
        assert_eq!(schema["required"], json!(["result", "message"]));
    }

    #[test]
    fn test_hints_annotations() {
        let annotations = Hints::READ.annotations("List Servers");
        assert_eq!(annotations.read_only_hint, Some(true));
        assert_eq!(annotations.destructive_hint, Some(false));
        assert_eq!(annotations.title.as_deref(), Some("List Servers"));
    }

    #[test]
    fn test_require_rejects_blank() {
        assert_eq!(require("get", "server_id", Some("s1".into())).unwrap(), "s1");
        let err = require("get", "server_id", Some("  ".into())).unwrap_err();
        assert_eq!(err.to_string(), "`server_id` is required for get operation");
        assert!(require("get", "server_id", None).is_err());
    }

    #[test]
    fn test_require_all_reports_every_missing_field() {
        let [name, image] =
            require_all("create", [("name", Some("web".into())), ("image", Some("nginx".into()))])
                .unwrap();
        assert_eq!((name.as_str(), image.as_str()), ("web", "nginx"));

        let err = require_all(
            "create",
            [("name", None), ("server_id", Some("s1".into())), ("image", Some("".into()))],
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "`name`, `image` are required for create operation");
    }

    #[tokio::test]
    async fn test_send_builds_payload() {
        let stub = RecordingClient::returning(json!({ "id": "s1" }));
        let call = RemoteCall::write("CreateServer", json!({ "name": "web1" }))
            .reply("server")
            .confirm("Server 'web1' created successfully");

        let payload = call.send(&*stub).await.unwrap();
        assert_eq!(
            payload,
            json!({
                "server": { "id": "s1" },
                "message": "Server 'web1' created successfully"
            })
        );

        let calls = stub.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].verb, Verb::Write);
        assert_eq!(calls[0].operation, "CreateServer");
    }

    #[tokio::test]
    async fn test_execute_reply_key() {
        let stub = RecordingClient::returning(json!({ "status": "Queued" }));
        let payload = RemoteCall::execute("Deploy", json!({ "deployment": "d1" }))
            .send(&*stub)
            .await
            .unwrap();
        assert_eq!(payload, json!({ "update": { "status": "Queued" } }));
    }
}
