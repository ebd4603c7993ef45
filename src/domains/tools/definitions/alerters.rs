//! Alerter tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::common::{
    Hints, NoParams, OperationTool, Output, RemoteCall, require, require_all, to_params,
};
use crate::domains::tools::error::ToolError;

/// Parameters for reading one alerter.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct GetAlerterParams {
    /// Alerter name or ID.
    pub alerter_name: String,
}

/// Parameters targeting one alerter by ID.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct AlerterIdParams {
    /// Alerter ID.
    pub alerter_id: String,
}

/// Parameters for creating a webhook alerter.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct CreateAlerterParams {
    /// Alerter name.
    pub name: String,

    /// Webhook receiving the alerts.
    pub webhook_url: String,

    /// Whether the alerter is enabled (default: true).
    pub enabled: Option<bool>,

    /// Tags for the alerter.
    pub tags: Option<Vec<String>>,
}

/// Parameters for updating an alerter.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct UpdateAlerterParams {
    /// Alerter ID.
    pub alerter_id: String,

    /// Partial alerter configuration, sent as-is.
    pub config: Option<Map<String, Value>>,

    /// New webhook URL (merged into `config`).
    pub webhook_url: Option<String>,

    /// Enable or disable the alerter (merged into `config`).
    pub enabled: Option<bool>,

    /// New tags.
    pub tags: Option<Vec<String>>,
}

/// Operations offered by the alerter hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AlerterOperation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl AlerterOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Get => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Parameters for the alerter hub.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AlerterOpsParams {
    /// Operation to perform.
    pub operation: AlerterOperation,

    /// Alerter ID or name (required for get, update, delete).
    pub alerter_id: Option<String>,

    /// Alerter name (required for create).
    pub name: Option<String>,

    /// Webhook URL (required for create).
    pub webhook_url: Option<String>,

    /// Whether the alerter is enabled.
    pub enabled: Option<bool>,

    /// Partial alerter configuration for update.
    pub config: Option<Map<String, Value>>,

    /// Tags for the alerter.
    pub tags: Option<Vec<String>>,
}

impl AlerterOpsParams {
    pub fn into_op(self) -> Result<AlerterOp, ToolError> {
        let op = self.operation.as_str();
        Ok(match self.operation {
            AlerterOperation::List => AlerterOp::List,
            AlerterOperation::Get => AlerterOp::Get(GetAlerterParams {
                alerter_name: require(op, "alerter_id", self.alerter_id)?,
            }),
            AlerterOperation::Create => {
                let [name, webhook_url] =
                    require_all(op, [("name", self.name), ("webhook_url", self.webhook_url)])?;
                AlerterOp::Create(CreateAlerterParams {
                    name,
                    webhook_url,
                    enabled: self.enabled,
                    tags: self.tags,
                })
            }
            AlerterOperation::Update => AlerterOp::Update(UpdateAlerterParams {
                alerter_id: require(op, "alerter_id", self.alerter_id)?,
                config: self.config,
                webhook_url: self.webhook_url,
                enabled: self.enabled,
                tags: self.tags,
            }),
            AlerterOperation::Delete => AlerterOp::Delete(AlerterIdParams {
                alerter_id: require(op, "alerter_id", self.alerter_id)?,
            }),
        })
    }
}

#[derive(Debug, Serialize)]
struct AlerterConfigBody {
    webhook_url: String,
    enabled: bool,
}

#[derive(Debug, Serialize)]
struct CreateAlerterBody {
    name: String,
    config: AlerterConfigBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct UpdateAlerterBody {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<Vec<String>>,
}

/// One alerter operation, validated and ready to send.
#[derive(Debug, Clone, PartialEq)]
pub enum AlerterOp {
    List,
    Get(GetAlerterParams),
    Create(CreateAlerterParams),
    Update(UpdateAlerterParams),
    Delete(AlerterIdParams),
}

impl AlerterOp {
    pub fn into_call(self) -> Result<RemoteCall, ToolError> {
        Ok(match self {
            Self::List => RemoteCall::read("ListAlerters", json!({})).reply("alerters"),
            Self::Get(p) => RemoteCall::read("GetAlerter", json!({ "alerter": p.alerter_name }))
                .reply("alerter"),
            Self::Create(p) => {
                let message = format!("Alerter '{}' created successfully", p.name);
                let body = CreateAlerterBody {
                    name: p.name,
                    config: AlerterConfigBody {
                        webhook_url: p.webhook_url,
                        enabled: p.enabled.unwrap_or(true),
                    },
                    tags: p.tags,
                };
                RemoteCall::write("CreateAlerter", to_params(&body)?)
                    .reply("alerter")
                    .confirm(message)
            }
            Self::Update(p) => {
                let message = format!("Alerter '{}' updated successfully", p.alerter_id);
                let mut config = p.config.unwrap_or_default();
                if let Some(url) = p.webhook_url {
                    config.insert("webhook_url".to_string(), Value::String(url));
                }
                if let Some(enabled) = p.enabled {
                    config.insert("enabled".to_string(), Value::Bool(enabled));
                }
                let body = UpdateAlerterBody {
                    id: p.alerter_id,
                    config: (!config.is_empty()).then_some(config),
                    tags: p.tags,
                };
                RemoteCall::write("UpdateAlerter", to_params(&body)?)
                    .reply("alerter")
                    .confirm(message)
            }
            Self::Delete(p) => {
                let message = format!("Alerter '{}' deleted successfully", p.alerter_id);
                RemoteCall::write("DeleteAlerter", json!({ "id": p.alerter_id })).confirm(message)
            }
        })
    }
}

pub struct ListAlertersTool;

impl OperationTool for ListAlertersTool {
    const NAME: &'static str = "list_alerters";
    const TITLE: &'static str = "List Alerters";
    const DESCRIPTION: &'static str = "List all alerters configured in Komodo.";
    const HINTS: Hints = Hints::READ;
    const OUTPUT: Option<Output> = Some(Output::list("alerters"));
    type Params = NoParams;

    fn plan(_: NoParams) -> Result<RemoteCall, ToolError> {
        AlerterOp::List.into_call()
    }
}

pub struct GetAlerterInfoTool;

impl OperationTool for GetAlerterInfoTool {
    const NAME: &'static str = "get_alerter_info";
    const TITLE: &'static str = "Get Alerter Info";
    const DESCRIPTION: &'static str = "Get detailed information about a specific alerter.";
    const HINTS: Hints = Hints::READ;
    const OUTPUT: Option<Output> = Some(Output::item("alerter"));
    type Params = GetAlerterParams;

    fn plan(params: GetAlerterParams) -> Result<RemoteCall, ToolError> {
        AlerterOp::Get(params).into_call()
    }
}

pub struct CreateAlerterTool;

impl OperationTool for CreateAlerterTool {
    const NAME: &'static str = "create_alerter";
    const TITLE: &'static str = "Create Alerter";
    const DESCRIPTION: &'static str = "Create a webhook alerter. It is enabled unless `enabled` is false.";
    const HINTS: Hints = Hints::MUTATING;
    const OUTPUT: Option<Output> = Some(Output::confirmed("alerter"));
    type Params = CreateAlerterParams;

    fn plan(params: CreateAlerterParams) -> Result<RemoteCall, ToolError> {
        AlerterOp::Create(params).into_call()
    }
}

pub struct UpdateAlerterTool;

impl OperationTool for UpdateAlerterTool {
    const NAME: &'static str = "update_alerter";
    const TITLE: &'static str = "Update Alerter";
    const DESCRIPTION: &'static str = "Update an alerter's configuration or tags.";
    const HINTS: Hints = Hints::MUTATING;
    const OUTPUT: Option<Output> = Some(Output::confirmed("alerter"));
    type Params = UpdateAlerterParams;

    fn plan(params: UpdateAlerterParams) -> Result<RemoteCall, ToolError> {
        AlerterOp::Update(params).into_call()
    }
}

pub struct DeleteAlerterTool;

impl OperationTool for DeleteAlerterTool {
    const NAME: &'static str = "delete_alerter";
    const TITLE: &'static str = "Delete Alerter";
    const DESCRIPTION: &'static str = "Delete an alerter from Komodo.";
    const HINTS: Hints = Hints::DESTRUCTIVE;
    const OUTPUT: Option<Output> = Some(Output::DELETED);
    type Params = AlerterIdParams;

    fn plan(params: AlerterIdParams) -> Result<RemoteCall, ToolError> {
        AlerterOp::Delete(params).into_call()
    }
}

/// Alerter hub.
pub struct AlerterOpsTool;

impl OperationTool for AlerterOpsTool {
    const NAME: &'static str = "komodo_alerter_ops";
    const TITLE: &'static str = "Komodo Alerter Operations";
    const DESCRIPTION: &'static str = "Alerter management hub. Operations: list, get, create (name and webhook_url required), update, delete.";
    const HINTS: Hints = Hints::DESTRUCTIVE;
    type Params = AlerterOpsParams;

    fn plan(params: AlerterOpsParams) -> Result<RemoteCall, ToolError> {
        params.into_op()?.into_call()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::testing::{assert_same_call, rejected, single_call};

    #[tokio::test]
    async fn test_create_alerter_defaults_enabled() {
        let call = single_call::<CreateAlerterTool>(json!({
            "name": "ops",
            "webhook_url": "https://hooks.example.com/x"
        }))
        .await;
        assert_eq!(call.operation, "CreateAlerter");
        assert_eq!(
            call.params,
            json!({
                "name": "ops",
                "config": { "webhook_url": "https://hooks.example.com/x", "enabled": true }
            })
        );
    }

    #[tokio::test]
    async fn test_update_merges_config_fields() {
        let call = single_call::<UpdateAlerterTool>(json!({
            "alerter_id": "a1",
            "config": { "send_resolved": true },
            "enabled": false
        }))
        .await;
        assert_eq!(
            call.params,
            json!({ "id": "a1", "config": { "send_resolved": true, "enabled": false } })
        );

        let call = single_call::<UpdateAlerterTool>(json!({ "alerter_id": "a1", "tags": [] })).await;
        assert_eq!(call.params, json!({ "id": "a1", "tags": [] }));
    }

    #[tokio::test]
    async fn test_hub_matches_operation_tools() {
        assert_same_call::<GetAlerterInfoTool, AlerterOpsTool>(
            json!({ "alerter_name": "ops" }),
            json!({ "operation": "get", "alerter_id": "ops" }),
        )
        .await;
        assert_same_call::<CreateAlerterTool, AlerterOpsTool>(
            json!({ "name": "ops", "webhook_url": "https://h", "enabled": false }),
            json!({ "operation": "create", "name": "ops", "webhook_url": "https://h", "enabled": false }),
        )
        .await;
        assert_same_call::<DeleteAlerterTool, AlerterOpsTool>(
            json!({ "alerter_id": "a1" }),
            json!({ "operation": "delete", "alerter_id": "a1" }),
        )
        .await;
    }

    #[tokio::test]
    async fn test_hub_missing_fields() {
        let text = rejected::<AlerterOpsTool>(json!({ "operation": "create", "name": "ops" })).await;
        assert_eq!(text, "Error: `webhook_url` is required for create operation");
    }
}
