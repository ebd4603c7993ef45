//! Docker container tools.
//!
//! Containers are addressed by server plus container name, so every
//! operation (listing included) needs a server.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;

use super::common::{Hints, OperationTool, Output, RemoteCall, require, require_all};
use crate::domains::tools::error::ToolError;

/// Parameters targeting one server.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct ContainerServerParams {
    /// Server ID or name.
    pub server_id: String,
}

/// Parameters targeting one container on a server.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct ContainerParams {
    /// Server ID or name.
    pub server_id: String,

    /// Container name.
    pub container_name: String,
}

/// Operations offered by the container hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContainerOperation {
    List,
    Inspect,
    Start,
    Stop,
    Restart,
}

impl ContainerOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Inspect => "inspect",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
        }
    }
}

/// Parameters for the container hub.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ContainerOpsParams {
    /// Operation to perform.
    pub operation: ContainerOperation,

    /// Server ID (required for every operation).
    pub server_id: Option<String>,

    /// Container name (required for inspect, start, stop, restart).
    pub container_name: Option<String>,
}

impl ContainerOpsParams {
    pub fn into_op(self) -> Result<ContainerOp, ToolError> {
        let op = self.operation.as_str();
        Ok(match self.operation {
            ContainerOperation::List => ContainerOp::List(ContainerServerParams {
                server_id: require(op, "server_id", self.server_id)?,
            }),
            ContainerOperation::Inspect => {
                ContainerOp::Inspect(container(op, self.server_id, self.container_name)?)
            }
            ContainerOperation::Start => {
                ContainerOp::Start(container(op, self.server_id, self.container_name)?)
            }
            ContainerOperation::Stop => {
                ContainerOp::Stop(container(op, self.server_id, self.container_name)?)
            }
            ContainerOperation::Restart => {
                ContainerOp::Restart(container(op, self.server_id, self.container_name)?)
            }
        })
    }
}

fn container(
    operation: &'static str,
    server_id: Option<String>,
    container_name: Option<String>,
) -> Result<ContainerParams, ToolError> {
    let [server_id, container_name] = require_all(
        operation,
        [("server_id", server_id), ("container_name", container_name)],
    )?;
    Ok(ContainerParams {
        server_id,
        container_name,
    })
}

/// One container operation, validated and ready to send.
#[derive(Debug, Clone, PartialEq)]
pub enum ContainerOp {
    List(ContainerServerParams),
    Inspect(ContainerParams),
    Start(ContainerParams),
    Stop(ContainerParams),
    Restart(ContainerParams),
}

impl ContainerOp {
    pub fn into_call(self) -> Result<RemoteCall, ToolError> {
        let target = |p: ContainerParams| json!({ "server": p.server_id, "container": p.container_name });

        Ok(match self {
            Self::List(p) => RemoteCall::read("ListDockerContainers", json!({ "server": p.server_id }))
                .reply("containers"),
            Self::Inspect(p) => RemoteCall::read("InspectDockerContainer", target(p)).reply("container"),
            Self::Start(p) => RemoteCall::execute("StartContainer", target(p)),
            Self::Stop(p) => RemoteCall::execute("StopContainer", target(p)),
            Self::Restart(p) => RemoteCall::execute("RestartContainer", target(p)),
        })
    }
}

pub struct ListDockerContainersTool;

impl OperationTool for ListDockerContainersTool {
    const NAME: &'static str = "list_docker_containers";
    const TITLE: &'static str = "List Docker Containers";
    const DESCRIPTION: &'static str = "List the Docker containers running on a server.";
    const HINTS: Hints = Hints::READ;
    const OUTPUT: Option<Output> = Some(Output::list("containers"));
    type Params = ContainerServerParams;

    fn plan(params: ContainerServerParams) -> Result<RemoteCall, ToolError> {
        ContainerOp::List(params).into_call()
    }
}

pub struct InspectDockerContainerTool;

impl OperationTool for InspectDockerContainerTool {
    const NAME: &'static str = "inspect_docker_container";
    const TITLE: &'static str = "Inspect Docker Container";
    const DESCRIPTION: &'static str = "Get the full Docker inspect output of a container.";
    const HINTS: Hints = Hints::READ;
    const OUTPUT: Option<Output> = Some(Output::item("container"));
    type Params = ContainerParams;

    fn plan(params: ContainerParams) -> Result<RemoteCall, ToolError> {
        ContainerOp::Inspect(params).into_call()
    }
}

pub struct StartContainerTool;

impl OperationTool for StartContainerTool {
    const NAME: &'static str = "start_container";
    const TITLE: &'static str = "Start Container";
    const DESCRIPTION: &'static str = "Start a stopped container.";
    const HINTS: Hints = Hints::MUTATING;
    const OUTPUT: Option<Output> = Some(Output::UPDATE);
    type Params = ContainerParams;

    fn plan(params: ContainerParams) -> Result<RemoteCall, ToolError> {
        ContainerOp::Start(params).into_call()
    }
}

pub struct StopContainerTool;

impl OperationTool for StopContainerTool {
    const NAME: &'static str = "stop_container";
    const TITLE: &'static str = "Stop Container";
    const DESCRIPTION: &'static str = "Stop a running container.";
    const HINTS: Hints = Hints::MUTATING;
    const OUTPUT: Option<Output> = Some(Output::UPDATE);
    type Params = ContainerParams;

    fn plan(params: ContainerParams) -> Result<RemoteCall, ToolError> {
        ContainerOp::Stop(params).into_call()
    }
}

pub struct RestartContainerTool;

impl OperationTool for RestartContainerTool {
    const NAME: &'static str = "restart_container";
    const TITLE: &'static str = "Restart Container";
    const DESCRIPTION: &'static str = "Restart a container.";
    const HINTS: Hints = Hints::MUTATING;
    const OUTPUT: Option<Output> = Some(Output::UPDATE);
    type Params = ContainerParams;

    fn plan(params: ContainerParams) -> Result<RemoteCall, ToolError> {
        ContainerOp::Restart(params).into_call()
    }
}

/// Container hub.
pub struct ContainerOpsTool;

impl OperationTool for ContainerOpsTool {
    const NAME: &'static str = "komodo_container_ops";
    const TITLE: &'static str = "Komodo Container Operations";
    const DESCRIPTION: &'static str = "Docker container hub. Operations: list (containers on a server), inspect, start, stop, restart. Every operation needs server_id; all but list also need container_name.";
    const HINTS: Hints = Hints::MUTATING;
    type Params = ContainerOpsParams;

    fn plan(params: ContainerOpsParams) -> Result<RemoteCall, ToolError> {
        params.into_op()?.into_call()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::komodo::Verb;
    use crate::domains::tools::definitions::testing::{assert_same_call, rejected, single_call};

    #[tokio::test]
    async fn test_inspect_payload() {
        let call = single_call::<InspectDockerContainerTool>(json!({
            "server_id": "s1",
            "container_name": "nginx"
        }))
        .await;
        assert_eq!(call.verb, Verb::Read);
        assert_eq!(call.operation, "InspectDockerContainer");
        assert_eq!(call.params, json!({ "server": "s1", "container": "nginx" }));
    }

    #[tokio::test]
    async fn test_hub_matches_operation_tools() {
        assert_same_call::<ListDockerContainersTool, ContainerOpsTool>(
            json!({ "server_id": "s1" }),
            json!({ "operation": "list", "server_id": "s1" }),
        )
        .await;
        assert_same_call::<RestartContainerTool, ContainerOpsTool>(
            json!({ "server_id": "s1", "container_name": "db" }),
            json!({ "operation": "restart", "server_id": "s1", "container_name": "db" }),
        )
        .await;
        assert_same_call::<StartContainerTool, ContainerOpsTool>(
            json!({ "server_id": "s1", "container_name": "db" }),
            json!({ "operation": "start", "server_id": "s1", "container_name": "db" }),
        )
        .await;
        assert_same_call::<StopContainerTool, ContainerOpsTool>(
            json!({ "server_id": "s1", "container_name": "db" }),
            json!({ "operation": "stop", "server_id": "s1", "container_name": "db" }),
        )
        .await;
    }

    #[tokio::test]
    async fn test_list_requires_server() {
        let text = rejected::<ContainerOpsTool>(json!({ "operation": "list" })).await;
        assert_eq!(text, "Error: `server_id` is required for list operation");

        let text = rejected::<ListDockerContainersTool>(json!({})).await;
        assert!(text.contains("server_id"));
    }

    #[tokio::test]
    async fn test_hub_missing_container() {
        let text =
            rejected::<ContainerOpsTool>(json!({ "operation": "stop", "server_id": "s1" })).await;
        assert_eq!(text, "Error: `container_name` is required for stop operation");
    }
}
