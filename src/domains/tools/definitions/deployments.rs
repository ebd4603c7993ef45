//! Deployment management tools.
//!
//! Covers the deployment lifecycle: CRUD plus deploy/start/stop/restart.
//! The typed container settings (ports, volumes, environment, labels) are
//! shared by create and update.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

use super::common::{
    Hints, NoParams, OperationTool, Output, RemoteCall, require, require_all, to_params,
};
use crate::domains::tools::error::ToolError;

/// Restart policy applied when none is given.
pub const DEFAULT_RESTART_MODE: &str = "unless-stopped";

// ============================================================================
// Container Settings
// ============================================================================

/// A host port published to a container port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PortMapping {
    /// Host port.
    pub local: String,
    /// Container port.
    pub container: String,
}

/// A host path mounted into the container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VolumeMount {
    /// Host path.
    pub local: String,
    /// Path inside the container.
    pub container: String,
}

/// One environment variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EnvVar {
    pub variable: String,
    pub value: String,
}

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters targeting one deployment.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct DeploymentIdParams {
    /// Deployment ID or name.
    pub deployment_id: String,
}

/// Parameters for creating a deployment.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct CreateDeploymentParams {
    /// Deployment name.
    pub name: String,

    /// Server the deployment runs on.
    pub server_id: String,

    /// Docker image to deploy.
    pub image: String,

    /// Restart mode (default: "unless-stopped").
    pub restart_mode: Option<String>,

    /// Docker network.
    pub network: Option<String>,

    /// Port mappings.
    pub ports: Option<Vec<PortMapping>>,

    /// Volume mounts.
    pub volumes: Option<Vec<VolumeMount>>,

    /// Environment variables.
    pub environment: Option<Vec<EnvVar>>,

    /// Docker labels.
    pub labels: Option<BTreeMap<String, String>>,

    /// Deployment description.
    pub description: Option<String>,

    /// Tags for the deployment.
    pub tags: Option<Vec<String>>,
}

/// Parameters for updating a deployment. Only provided fields change.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct UpdateDeploymentParams {
    /// ID of the deployment to update.
    pub deployment_id: String,

    /// Move the deployment to another server.
    pub server_id: Option<String>,

    /// New Docker image.
    pub image: Option<String>,

    /// New restart mode.
    pub restart_mode: Option<String>,

    /// New Docker network.
    pub network: Option<String>,

    /// Replacement port mappings.
    pub ports: Option<Vec<PortMapping>>,

    /// Replacement volume mounts.
    pub volumes: Option<Vec<VolumeMount>>,

    /// Replacement environment variables.
    pub environment: Option<Vec<EnvVar>>,

    /// Replacement Docker labels.
    pub labels: Option<BTreeMap<String, String>>,

    /// New description.
    pub description: Option<String>,

    /// New tags.
    pub tags: Option<Vec<String>>,
}

/// Operations offered by the deployment hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentOperation {
    List,
    Get,
    Create,
    Update,
    Deploy,
    Start,
    Stop,
    Restart,
    Delete,
}

impl DeploymentOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Get => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Deploy => "deploy",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
            Self::Delete => "delete",
        }
    }
}

/// Parameters for the deployment hub.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeploymentOpsParams {
    /// Operation to perform.
    pub operation: DeploymentOperation,

    /// Deployment ID (required for every operation except list and create).
    pub deployment_id: Option<String>,

    /// Deployment name (required for create).
    pub name: Option<String>,

    /// Server ID (required for create).
    pub server_id: Option<String>,

    /// Docker image (required for create).
    pub image: Option<String>,

    /// Restart mode (e.g. "unless-stopped").
    pub restart_mode: Option<String>,

    /// Docker network.
    pub network: Option<String>,

    /// Port mappings.
    pub ports: Option<Vec<PortMapping>>,

    /// Volume mounts.
    pub volumes: Option<Vec<VolumeMount>>,

    /// Environment variables.
    pub environment: Option<Vec<EnvVar>>,

    /// Docker labels.
    pub labels: Option<BTreeMap<String, String>>,

    /// Deployment description.
    pub description: Option<String>,

    /// Tags for the deployment.
    pub tags: Option<Vec<String>>,
}

impl DeploymentOpsParams {
    pub fn into_op(self) -> Result<DeploymentOp, ToolError> {
        let op = self.operation.as_str();
        let target = |id: Option<String>| -> Result<DeploymentIdParams, ToolError> {
            Ok(DeploymentIdParams {
                deployment_id: require(op, "deployment_id", id)?,
            })
        };

        Ok(match self.operation {
            DeploymentOperation::List => DeploymentOp::List,
            DeploymentOperation::Get => DeploymentOp::Get(target(self.deployment_id)?),
            DeploymentOperation::Create => {
                let [name, server_id, image] = require_all(
                    op,
                    [
                        ("name", self.name),
                        ("server_id", self.server_id),
                        ("image", self.image),
                    ],
                )?;
                DeploymentOp::Create(CreateDeploymentParams {
                    name,
                    server_id,
                    image,
                    restart_mode: self.restart_mode,
                    network: self.network,
                    ports: self.ports,
                    volumes: self.volumes,
                    environment: self.environment,
                    labels: self.labels,
                    description: self.description,
                    tags: self.tags,
                })
            }
            DeploymentOperation::Update => DeploymentOp::Update(UpdateDeploymentParams {
                deployment_id: require(op, "deployment_id", self.deployment_id)?,
                server_id: self.server_id,
                image: self.image,
                restart_mode: self.restart_mode,
                network: self.network,
                ports: self.ports,
                volumes: self.volumes,
                environment: self.environment,
                labels: self.labels,
                description: self.description,
                tags: self.tags,
            }),
            DeploymentOperation::Deploy => DeploymentOp::Deploy(target(self.deployment_id)?),
            DeploymentOperation::Start => DeploymentOp::Start(target(self.deployment_id)?),
            DeploymentOperation::Stop => DeploymentOp::Stop(target(self.deployment_id)?),
            DeploymentOperation::Restart => DeploymentOp::Restart(target(self.deployment_id)?),
            DeploymentOperation::Delete => DeploymentOp::Delete(target(self.deployment_id)?),
        })
    }
}

// ============================================================================
// Remote Payloads
// ============================================================================

#[derive(Debug, Default, PartialEq, Serialize)]
struct DeploymentConfigBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    server_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    restart: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    network: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ports: Option<Vec<PortMapping>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    volumes: Option<Vec<VolumeMount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    environment: Option<Vec<EnvVar>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    labels: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Serialize)]
struct CreateDeploymentBody {
    name: String,
    config: DeploymentConfigBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct UpdateDeploymentBody {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<DeploymentConfigBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<Vec<String>>,
}

// ============================================================================
// Canonical Operation
// ============================================================================

/// One deployment operation, validated and ready to send.
#[derive(Debug, Clone, PartialEq)]
pub enum DeploymentOp {
    List,
    Get(DeploymentIdParams),
    Create(CreateDeploymentParams),
    Update(UpdateDeploymentParams),
    Deploy(DeploymentIdParams),
    Start(DeploymentIdParams),
    Stop(DeploymentIdParams),
    Restart(DeploymentIdParams),
    Delete(DeploymentIdParams),
}

impl DeploymentOp {
    pub fn into_call(self) -> Result<RemoteCall, ToolError> {
        let lifecycle = |operation: &'static str, p: DeploymentIdParams| {
            RemoteCall::execute(operation, json!({ "deployment": p.deployment_id }))
        };

        Ok(match self {
            Self::List => RemoteCall::read("ListDeployments", json!({})).reply("deployments"),
            Self::Get(p) => RemoteCall::read("GetDeployment", json!({ "deployment": p.deployment_id }))
                .reply("deployment"),
            Self::Create(p) => {
                let message = format!("Deployment '{}' created successfully", p.name);
                let body = CreateDeploymentBody {
                    name: p.name,
                    config: DeploymentConfigBody {
                        server_id: Some(p.server_id),
                        image: Some(p.image),
                        restart: Some(
                            p.restart_mode
                                .unwrap_or_else(|| DEFAULT_RESTART_MODE.to_string()),
                        ),
                        network: p.network,
                        ports: p.ports,
                        volumes: p.volumes,
                        environment: p.environment,
                        labels: p.labels,
                    },
                    description: p.description,
                    tags: p.tags,
                };
                RemoteCall::write("CreateDeployment", to_params(&body)?)
                    .reply("deployment")
                    .confirm(message)
            }
            Self::Update(p) => {
                let message = format!("Deployment '{}' updated successfully", p.deployment_id);
                let config = DeploymentConfigBody {
                    server_id: p.server_id,
                    image: p.image,
                    restart: p.restart_mode,
                    network: p.network,
                    ports: p.ports,
                    volumes: p.volumes,
                    environment: p.environment,
                    labels: p.labels,
                };
                let body = UpdateDeploymentBody {
                    id: p.deployment_id,
                    config: (config != DeploymentConfigBody::default()).then_some(config),
                    description: p.description,
                    tags: p.tags,
                };
                RemoteCall::write("UpdateDeployment", to_params(&body)?)
                    .reply("deployment")
                    .confirm(message)
            }
            Self::Deploy(p) => lifecycle("Deploy", p),
            Self::Start(p) => lifecycle("StartDeployment", p),
            Self::Stop(p) => lifecycle("StopDeployment", p),
            Self::Restart(p) => lifecycle("RestartDeployment", p),
            Self::Delete(p) => {
                let message = format!("Deployment '{}' deleted successfully", p.deployment_id);
                RemoteCall::write("DeleteDeployment", json!({ "id": p.deployment_id }))
                    .confirm(message)
            }
        })
    }
}

// ============================================================================
// Tool Definitions
// ============================================================================

pub struct ListDeploymentsTool;

impl OperationTool for ListDeploymentsTool {
    const NAME: &'static str = "list_deployments";
    const TITLE: &'static str = "List Deployments";
    const DESCRIPTION: &'static str = "List all deployments in Komodo.";
    const HINTS: Hints = Hints::READ;
    const OUTPUT: Option<Output> = Some(Output::list("deployments"));
    type Params = NoParams;

    fn plan(_: NoParams) -> Result<RemoteCall, ToolError> {
        DeploymentOp::List.into_call()
    }
}

pub struct GetDeploymentTool;

impl OperationTool for GetDeploymentTool {
    const NAME: &'static str = "get_deployment";
    const TITLE: &'static str = "Get Deployment";
    const DESCRIPTION: &'static str = "Get detailed information about a specific deployment.";
    const HINTS: Hints = Hints::READ;
    const OUTPUT: Option<Output> = Some(Output::item("deployment"));
    type Params = DeploymentIdParams;

    fn plan(params: DeploymentIdParams) -> Result<RemoteCall, ToolError> {
        DeploymentOp::Get(params).into_call()
    }
}

pub struct CreateDeploymentTool;

impl OperationTool for CreateDeploymentTool {
    const NAME: &'static str = "create_deployment";
    const TITLE: &'static str = "Create Deployment";
    const DESCRIPTION: &'static str = "Create a new deployment running a Docker image on a server.";
    const HINTS: Hints = Hints::MUTATING;
    const OUTPUT: Option<Output> = Some(Output::confirmed("deployment"));
    type Params = CreateDeploymentParams;

    fn plan(params: CreateDeploymentParams) -> Result<RemoteCall, ToolError> {
        DeploymentOp::Create(params).into_call()
    }
}

pub struct UpdateDeploymentTool;

impl OperationTool for UpdateDeploymentTool {
    const NAME: &'static str = "update_deployment";
    const TITLE: &'static str = "Update Deployment";
    const DESCRIPTION: &'static str = "Update an existing deployment's configuration.";
    const HINTS: Hints = Hints::MUTATING;
    const OUTPUT: Option<Output> = Some(Output::confirmed("deployment"));
    type Params = UpdateDeploymentParams;

    fn plan(params: UpdateDeploymentParams) -> Result<RemoteCall, ToolError> {
        DeploymentOp::Update(params).into_call()
    }
}

pub struct DeployTool;

impl OperationTool for DeployTool {
    const NAME: &'static str = "deploy";
    const TITLE: &'static str = "Deploy";
    const DESCRIPTION: &'static str = "Deploy (or redeploy) a deployment's container.";
    const HINTS: Hints = Hints::MUTATING;
    const OUTPUT: Option<Output> = Some(Output::UPDATE);
    type Params = DeploymentIdParams;

    fn plan(params: DeploymentIdParams) -> Result<RemoteCall, ToolError> {
        DeploymentOp::Deploy(params).into_call()
    }
}

pub struct StartDeploymentTool;

impl OperationTool for StartDeploymentTool {
    const NAME: &'static str = "start_deployment";
    const TITLE: &'static str = "Start Deployment";
    const DESCRIPTION: &'static str = "Start a stopped deployment.";
    const HINTS: Hints = Hints::MUTATING;
    const OUTPUT: Option<Output> = Some(Output::UPDATE);
    type Params = DeploymentIdParams;

    fn plan(params: DeploymentIdParams) -> Result<RemoteCall, ToolError> {
        DeploymentOp::Start(params).into_call()
    }
}

pub struct StopDeploymentTool;

impl OperationTool for StopDeploymentTool {
    const NAME: &'static str = "stop_deployment";
    const TITLE: &'static str = "Stop Deployment";
    const DESCRIPTION: &'static str = "Stop a running deployment.";
    const HINTS: Hints = Hints::MUTATING;
    const OUTPUT: Option<Output> = Some(Output::UPDATE);
    type Params = DeploymentIdParams;

    fn plan(params: DeploymentIdParams) -> Result<RemoteCall, ToolError> {
        DeploymentOp::Stop(params).into_call()
    }
}

pub struct RestartDeploymentTool;

impl OperationTool for RestartDeploymentTool {
    const NAME: &'static str = "restart_deployment";
    const TITLE: &'static str = "Restart Deployment";
    const DESCRIPTION: &'static str = "Restart a deployment's container.";
    const HINTS: Hints = Hints::MUTATING;
    const OUTPUT: Option<Output> = Some(Output::UPDATE);
    type Params = DeploymentIdParams;

    fn plan(params: DeploymentIdParams) -> Result<RemoteCall, ToolError> {
        DeploymentOp::Restart(params).into_call()
    }
}

pub struct DeleteDeploymentTool;

impl OperationTool for DeleteDeploymentTool {
    const NAME: &'static str = "delete_deployment";
    const TITLE: &'static str = "Delete Deployment";
    const DESCRIPTION: &'static str = "Delete a deployment from Komodo.";
    const HINTS: Hints = Hints::DESTRUCTIVE;
    const OUTPUT: Option<Output> = Some(Output::DELETED);
    type Params = DeploymentIdParams;

    fn plan(params: DeploymentIdParams) -> Result<RemoteCall, ToolError> {
        DeploymentOp::Delete(params).into_call()
    }
}

/// Deployment hub.
pub struct DeploymentOpsTool;

impl OperationTool for DeploymentOpsTool {
    const NAME: &'static str = "komodo_deployment_ops";
    const TITLE: &'static str = "Komodo Deployment Operations";
    const DESCRIPTION: &'static str = "Deployment management hub. Operations: list, get, create (name, server_id and image required), update, deploy, start, stop, restart, delete.";
    const HINTS: Hints = Hints::DESTRUCTIVE;
    type Params = DeploymentOpsParams;

    fn plan(params: DeploymentOpsParams) -> Result<RemoteCall, ToolError> {
        params.into_op()?.into_call()
    }
}
