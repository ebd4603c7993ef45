//! Server management tools.
//!
//! Per-operation tools (`list_servers`, `create_server`, ...) and the
//! `komodo_server_ops` hub both lower into [`ServerOp`], which alone builds
//! the remote request.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::common::{
    Hints, NoParams, OperationTool, Output, RemoteCall, require, require_all, to_params,
};
use crate::domains::tools::error::ToolError;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters targeting one server.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct ServerIdParams {
    /// Server ID or name.
    pub server_id: String,
}

/// Parameters for creating a server.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct CreateServerParams {
    /// Server name.
    pub name: String,

    /// Periphery address (e.g. `http://localhost:8120`).
    pub address: String,

    /// Server region.
    pub region: Option<String>,

    /// Whether the server is enabled (default: true).
    pub enabled: Option<bool>,

    /// Server description.
    pub description: Option<String>,

    /// Tags for the server.
    pub tags: Option<Vec<String>>,
}

/// Parameters for updating a server. Only provided fields change.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct UpdateServerParams {
    /// ID of the server to update.
    pub server_id: String,

    /// New server name.
    pub name: Option<String>,

    /// New periphery address.
    pub address: Option<String>,

    /// New server region.
    pub region: Option<String>,

    /// Whether the server is enabled.
    pub enabled: Option<bool>,

    /// New server description.
    pub description: Option<String>,

    /// New tags for the server.
    pub tags: Option<Vec<String>>,
}

/// Parameters for renaming a server.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct RenameServerParams {
    /// ID of the server to rename.
    pub server_id: String,

    /// New name for the server.
    pub new_name: String,
}

/// Operations offered by the server hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ServerOperation {
    List,
    Get,
    Create,
    Update,
    Delete,
    Rename,
}

impl ServerOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Get => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Rename => "rename",
        }
    }
}

/// Parameters for the server hub: the union of every operation's fields.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ServerOpsParams {
    /// Operation to perform.
    pub operation: ServerOperation,

    /// Server ID (required for get, update, delete, rename).
    pub server_id: Option<String>,

    /// Server name (required for create).
    pub name: Option<String>,

    /// Periphery address (required for create).
    pub address: Option<String>,

    /// Server region.
    pub region: Option<String>,

    /// Whether the server is enabled.
    pub enabled: Option<bool>,

    /// Server description.
    pub description: Option<String>,

    /// Tags for the server.
    pub tags: Option<Vec<String>>,

    /// New server name (required for rename).
    pub new_name: Option<String>,
}

impl ServerOpsParams {
    /// Validate the fields the selected operation needs.
    pub fn into_op(self) -> Result<ServerOp, ToolError> {
        let op = self.operation.as_str();
        Ok(match self.operation {
            ServerOperation::List => ServerOp::List,
            ServerOperation::Get => ServerOp::Get(ServerIdParams {
                server_id: require(op, "server_id", self.server_id)?,
            }),
            ServerOperation::Create => {
                let [name, address] =
                    require_all(op, [("name", self.name), ("address", self.address)])?;
                ServerOp::Create(CreateServerParams {
                    name,
                    address,
                    region: self.region,
                    enabled: self.enabled,
                    description: self.description,
                    tags: self.tags,
                })
            }
            ServerOperation::Update => ServerOp::Update(UpdateServerParams {
                server_id: require(op, "server_id", self.server_id)?,
                name: self.name,
                address: self.address,
                region: self.region,
                enabled: self.enabled,
                description: self.description,
                tags: self.tags,
            }),
            ServerOperation::Delete => ServerOp::Delete(ServerIdParams {
                server_id: require(op, "server_id", self.server_id)?,
            }),
            ServerOperation::Rename => {
                let [server_id, new_name] =
                    require_all(op, [("server_id", self.server_id), ("new_name", self.new_name)])?;
                ServerOp::Rename(RenameServerParams {
                    server_id,
                    new_name,
                })
            }
        })
    }
}

// ============================================================================
// Remote Payloads
// ============================================================================

#[derive(Debug, Default, PartialEq, Serialize)]
struct ServerConfigBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    enabled: Option<bool>,
}

#[derive(Debug, Serialize)]
struct CreateServerBody {
    name: String,
    config: ServerConfigBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct UpdateServerBody {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<ServerConfigBody>,
}

// ============================================================================
// Canonical Operation
// ============================================================================

/// One server operation, validated and ready to send.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerOp {
    List,
    Get(ServerIdParams),
    Create(CreateServerParams),
    Update(UpdateServerParams),
    Delete(ServerIdParams),
    Rename(RenameServerParams),
}

impl ServerOp {
    pub fn into_call(self) -> Result<RemoteCall, ToolError> {
        Ok(match self {
            Self::List => RemoteCall::read("ListServers", json!({})).reply("servers"),
            Self::Get(p) => {
                RemoteCall::read("GetServer", json!({ "server": p.server_id })).reply("server")
            }
            Self::Create(p) => {
                let message = format!("Server '{}' created successfully", p.name);
                let body = CreateServerBody {
                    name: p.name,
                    config: ServerConfigBody {
                        address: Some(p.address),
                        region: p.region,
                        enabled: Some(p.enabled.unwrap_or(true)),
                    },
                    description: p.description,
                    tags: p.tags,
                };
                RemoteCall::write("CreateServer", to_params(&body)?)
                    .reply("server")
                    .confirm(message)
            }
            Self::Update(p) => {
                let message = format!("Server '{}' updated successfully", p.server_id);
                let config = ServerConfigBody {
                    address: p.address,
                    region: p.region,
                    enabled: p.enabled,
                };
                let body = UpdateServerBody {
                    id: p.server_id,
                    name: p.name,
                    description: p.description,
                    tags: p.tags,
                    config: (config != ServerConfigBody::default()).then_some(config),
                };
                RemoteCall::write("UpdateServer", to_params(&body)?)
                    .reply("server")
                    .confirm(message)
            }
            Self::Delete(p) => {
                let message = format!("Server '{}' deleted successfully", p.server_id);
                RemoteCall::write("DeleteServer", json!({ "id": p.server_id })).confirm(message)
            }
            Self::Rename(p) => {
                let message = format!("Server '{}' renamed successfully", p.server_id);
                RemoteCall::write(
                    "RenameServer",
                    json!({ "id": p.server_id, "name": p.new_name }),
                )
                .reply("server")
                .confirm(message)
            }
        })
    }
}

// ============================================================================
// Tool Definitions
// ============================================================================

pub struct ListServersTool;

impl OperationTool for ListServersTool {
    const NAME: &'static str = "list_servers";
    const TITLE: &'static str = "List Servers";
    const DESCRIPTION: &'static str = "List all servers registered in Komodo.";
    const HINTS: Hints = Hints::READ;
    const OUTPUT: Option<Output> = Some(Output::list("servers"));
    type Params = NoParams;

    fn plan(_: NoParams) -> Result<RemoteCall, ToolError> {
        ServerOp::List.into_call()
    }
}

pub struct GetServerInfoTool;

impl OperationTool for GetServerInfoTool {
    const NAME: &'static str = "get_server_info";
    const TITLE: &'static str = "Get Server Info";
    const DESCRIPTION: &'static str = "Get detailed information about a specific server.";
    const HINTS: Hints = Hints::READ;
    const OUTPUT: Option<Output> = Some(Output::item("server"));
    type Params = ServerIdParams;

    fn plan(params: ServerIdParams) -> Result<RemoteCall, ToolError> {
        ServerOp::Get(params).into_call()
    }
}

pub struct CreateServerTool;

impl OperationTool for CreateServerTool {
    const NAME: &'static str = "create_server";
    const TITLE: &'static str = "Create Server";
    const DESCRIPTION: &'static str =
        "Register a new server in Komodo. The server is enabled unless `enabled` is false.";
    const HINTS: Hints = Hints::MUTATING;
    const OUTPUT: Option<Output> = Some(Output::confirmed("server"));
    type Params = CreateServerParams;

    fn plan(params: CreateServerParams) -> Result<RemoteCall, ToolError> {
        ServerOp::Create(params).into_call()
    }
}

pub struct UpdateServerTool;

impl OperationTool for UpdateServerTool {
    const NAME: &'static str = "update_server";
    const TITLE: &'static str = "Update Server";
    const DESCRIPTION: &'static str = "Update an existing server's configuration.";
    const HINTS: Hints = Hints::MUTATING;
    const OUTPUT: Option<Output> = Some(Output::confirmed("server"));
    type Params = UpdateServerParams;

    fn plan(params: UpdateServerParams) -> Result<RemoteCall, ToolError> {
        ServerOp::Update(params).into_call()
    }
}

pub struct DeleteServerTool;

impl OperationTool for DeleteServerTool {
    const NAME: &'static str = "delete_server";
    const TITLE: &'static str = "Delete Server";
    const DESCRIPTION: &'static str = "Delete a server from Komodo.";
    const HINTS: Hints = Hints::DESTRUCTIVE;
    const OUTPUT: Option<Output> = Some(Output::DELETED);
    type Params = ServerIdParams;

    fn plan(params: ServerIdParams) -> Result<RemoteCall, ToolError> {
        ServerOp::Delete(params).into_call()
    }
}

pub struct RenameServerTool;

impl OperationTool for RenameServerTool {
    const NAME: &'static str = "rename_server";
    const TITLE: &'static str = "Rename Server";
    const DESCRIPTION: &'static str = "Rename a server in Komodo.";
    const HINTS: Hints = Hints::MUTATING;
    const OUTPUT: Option<Output> = Some(Output::confirmed("server"));
    type Params = RenameServerParams;

    fn plan(params: RenameServerParams) -> Result<RemoteCall, ToolError> {
        ServerOp::Rename(params).into_call()
    }
}

/// Server hub: every server operation behind one `operation` field.
pub struct ServerOpsTool;

impl OperationTool for ServerOpsTool {
    const NAME: &'static str = "komodo_server_ops";
    const TITLE: &'static str = "Komodo Server Operations";
    const DESCRIPTION: &'static str = "Server management hub. Operations: list (all servers), get (server details), create (new server), update (server config), delete (remove server), rename (change server name).";
    const HINTS: Hints = Hints::DESTRUCTIVE;
    type Params = ServerOpsParams;

    fn plan(params: ServerOpsParams) -> Result<RemoteCall, ToolError> {
        params.into_op()?.into_call()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::komodo::Verb;
    use crate::domains::komodo::testing::RecordingClient;
    use crate::domains::tools::definitions::testing::{
        assert_same_call, payload, rejected, run, single_call,
    };

    #[tokio::test]
    async fn test_list_servers_wraps_result() {
        let stub = RecordingClient::returning(json!([{ "id": "s1" }]));
        let result = run::<ListServersTool>(&stub, json!({})).await;

        assert_eq!(result.is_error, Some(false));
        assert_eq!(payload(&result), &json!({ "servers": [{ "id": "s1" }] }));

        let calls = stub.calls();
        assert_eq!(calls[0].verb, Verb::Read);
        assert_eq!(calls[0].operation, "ListServers");
    }

    #[tokio::test]
    async fn test_create_server_defaults_enabled() {
        let call = single_call::<CreateServerTool>(json!({
            "name": "web1",
            "address": "http://host:8120"
        }))
        .await;

        assert_eq!(call.verb, Verb::Write);
        assert_eq!(call.operation, "CreateServer");
        assert_eq!(
            call.params,
            json!({
                "name": "web1",
                "config": { "address": "http://host:8120", "enabled": true }
            })
        );
        assert!(call.params["config"].get("region").is_none());
    }

    #[tokio::test]
    async fn test_create_server_confirmation() {
        let stub = RecordingClient::returning(json!({ "id": "s9" }));
        let result = run::<CreateServerTool>(
            &stub,
            json!({ "name": "web1", "address": "http://host:8120" }),
        )
        .await;
        assert_eq!(
            payload(&result),
            &json!({ "server": { "id": "s9" }, "message": "Server 'web1' created successfully" })
        );
    }

    #[tokio::test]
    async fn test_update_server_omits_empty_config() {
        let call =
            single_call::<UpdateServerTool>(json!({ "server_id": "s1", "description": "edge" }))
                .await;
        assert_eq!(call.params, json!({ "id": "s1", "description": "edge" }));

        let call = single_call::<UpdateServerTool>(json!({ "server_id": "s1", "enabled": false }))
            .await;
        assert_eq!(call.params, json!({ "id": "s1", "config": { "enabled": false } }));
    }

    #[tokio::test]
    async fn test_hub_matches_operation_tools() {
        assert_same_call::<ListServersTool, ServerOpsTool>(json!({}), json!({ "operation": "list" }))
            .await;
        assert_same_call::<GetServerInfoTool, ServerOpsTool>(
            json!({ "server_id": "s1" }),
            json!({ "operation": "get", "server_id": "s1" }),
        )
        .await;
        assert_same_call::<CreateServerTool, ServerOpsTool>(
            json!({ "name": "web1", "address": "http://host:8120", "region": "eu", "tags": ["a"] }),
            json!({
                "operation": "create",
                "name": "web1",
                "address": "http://host:8120",
                "region": "eu",
                "tags": ["a"]
            }),
        )
        .await;
        assert_same_call::<UpdateServerTool, ServerOpsTool>(
            json!({ "server_id": "s1", "address": "http://new:8120" }),
            json!({ "operation": "update", "server_id": "s1", "address": "http://new:8120" }),
        )
        .await;
        assert_same_call::<DeleteServerTool, ServerOpsTool>(
            json!({ "server_id": "s1" }),
            json!({ "operation": "delete", "server_id": "s1" }),
        )
        .await;
        assert_same_call::<RenameServerTool, ServerOpsTool>(
            json!({ "server_id": "s1", "new_name": "web2" }),
            json!({ "operation": "rename", "server_id": "s1", "new_name": "web2" }),
        )
        .await;
    }

    #[tokio::test]
    async fn test_hub_missing_fields() {
        let text = rejected::<ServerOpsTool>(json!({ "operation": "create", "name": "web1" })).await;
        assert_eq!(text, "Error: `address` is required for create operation");

        let text = rejected::<ServerOpsTool>(json!({ "operation": "rename", "server_id": "" })).await;
        assert_eq!(text, "Error: `server_id`, `new_name` are required for rename operation");

        let text = rejected::<ServerOpsTool>(json!({ "operation": "get" })).await;
        assert_eq!(text, "Error: `server_id` is required for get operation");
    }

    #[tokio::test]
    async fn test_operation_tool_missing_field() {
        let text = rejected::<GetServerInfoTool>(json!({})).await;
        assert!(text.contains("get_server_info"));
        assert!(text.contains("server_id"));
    }

    #[tokio::test]
    async fn test_blank_id_rejected_by_both_presentations() {
        let text = rejected::<DeleteServerTool>(json!({ "server_id": "" })).await;
        assert_eq!(text, "Error: `server_id` is required for delete_server operation");

        let text = rejected::<ServerOpsTool>(json!({ "operation": "delete", "server_id": "" })).await;
        assert_eq!(text, "Error: `server_id` is required for delete operation");

        let text = rejected::<RenameServerTool>(json!({ "server_id": " ", "new_name": "web2" })).await;
        assert_eq!(text, "Error: `server_id` is required for rename_server operation");
    }

    #[tokio::test]
    async fn test_hub_rejects_unknown_operation() {
        let text = rejected::<ServerOpsTool>(json!({ "operation": "reboot" })).await;
        assert!(text.contains("komodo_server_ops"));
    }
}
