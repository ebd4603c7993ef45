//! Docker Compose stack tools.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;

use super::common::{Hints, NoParams, OperationTool, Output, RemoteCall, require};
use crate::domains::tools::error::ToolError;

/// Parameters targeting one stack.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct StackIdParams {
    /// Stack ID or name.
    pub stack_id: String,
}

/// Operations offered by the stack hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum StackOperation {
    List,
    Get,
    Deploy,
    Start,
    Stop,
    Restart,
    Destroy,
    Delete,
}

impl StackOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Get => "get",
            Self::Deploy => "deploy",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
            Self::Destroy => "destroy",
            Self::Delete => "delete",
        }
    }
}

/// Parameters for the stack hub.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct StackOpsParams {
    /// Operation to perform.
    pub operation: StackOperation,

    /// Stack ID (required for every operation except list).
    pub stack_id: Option<String>,
}

impl StackOpsParams {
    pub fn into_op(self) -> Result<StackOp, ToolError> {
        if self.operation == StackOperation::List {
            return Ok(StackOp::List);
        }
        let target = StackIdParams {
            stack_id: require(self.operation.as_str(), "stack_id", self.stack_id)?,
        };
        Ok(match self.operation {
            StackOperation::List => StackOp::List,
            StackOperation::Get => StackOp::Get(target),
            StackOperation::Deploy => StackOp::Deploy(target),
            StackOperation::Start => StackOp::Start(target),
            StackOperation::Stop => StackOp::Stop(target),
            StackOperation::Restart => StackOp::Restart(target),
            StackOperation::Destroy => StackOp::Destroy(target),
            StackOperation::Delete => StackOp::Delete(target),
        })
    }
}

/// One stack operation, validated and ready to send.
#[derive(Debug, Clone, PartialEq)]
pub enum StackOp {
    List,
    Get(StackIdParams),
    Deploy(StackIdParams),
    Start(StackIdParams),
    Stop(StackIdParams),
    Restart(StackIdParams),
    Destroy(StackIdParams),
    Delete(StackIdParams),
}

impl StackOp {
    pub fn into_call(self) -> Result<RemoteCall, ToolError> {
        let lifecycle = |operation: &'static str, p: StackIdParams| {
            RemoteCall::execute(operation, json!({ "stack": p.stack_id }))
        };

        Ok(match self {
            Self::List => RemoteCall::read("ListStacks", json!({})).reply("stacks"),
            Self::Get(p) => RemoteCall::read("GetStack", json!({ "stack": p.stack_id })).reply("stack"),
            Self::Deploy(p) => lifecycle("DeployStack", p),
            Self::Start(p) => lifecycle("StartStack", p),
            Self::Stop(p) => lifecycle("StopStack", p),
            Self::Restart(p) => lifecycle("RestartStack", p),
            Self::Destroy(p) => lifecycle("DestroyStack", p),
            Self::Delete(p) => {
                let message = format!("Stack '{}' deleted successfully", p.stack_id);
                RemoteCall::write("DeleteStack", json!({ "id": p.stack_id })).confirm(message)
            }
        })
    }
}

pub struct ListStacksTool;

impl OperationTool for ListStacksTool {
    const NAME: &'static str = "list_stacks";
    const TITLE: &'static str = "List Stacks";
    const DESCRIPTION: &'static str = "List all Docker Compose stacks in Komodo.";
    const HINTS: Hints = Hints::READ;
    const OUTPUT: Option<Output> = Some(Output::list("stacks"));
    type Params = NoParams;

    fn plan(_: NoParams) -> Result<RemoteCall, ToolError> {
        StackOp::List.into_call()
    }
}

pub struct GetStackTool;

impl OperationTool for GetStackTool {
    const NAME: &'static str = "get_stack";
    const TITLE: &'static str = "Get Stack";
    const DESCRIPTION: &'static str = "Get detailed information about a specific stack.";
    const HINTS: Hints = Hints::READ;
    const OUTPUT: Option<Output> = Some(Output::item("stack"));
    type Params = StackIdParams;

    fn plan(params: StackIdParams) -> Result<RemoteCall, ToolError> {
        StackOp::Get(params).into_call()
    }
}

pub struct DeployStackTool;

impl OperationTool for DeployStackTool {
    const NAME: &'static str = "deploy_stack";
    const TITLE: &'static str = "Deploy Stack";
    const DESCRIPTION: &'static str = "Deploy a stack (docker compose up).";
    const HINTS: Hints = Hints::MUTATING;
    const OUTPUT: Option<Output> = Some(Output::UPDATE);
    type Params = StackIdParams;

    fn plan(params: StackIdParams) -> Result<RemoteCall, ToolError> {
        StackOp::Deploy(params).into_call()
    }
}

pub struct StartStackTool;

impl OperationTool for StartStackTool {
    const NAME: &'static str = "start_stack";
    const TITLE: &'static str = "Start Stack";
    const DESCRIPTION: &'static str = "Start a stopped stack.";
    const HINTS: Hints = Hints::MUTATING;
    const OUTPUT: Option<Output> = Some(Output::UPDATE);
    type Params = StackIdParams;

    fn plan(params: StackIdParams) -> Result<RemoteCall, ToolError> {
        StackOp::Start(params).into_call()
    }
}

pub struct StopStackTool;

impl OperationTool for StopStackTool {
    const NAME: &'static str = "stop_stack";
    const TITLE: &'static str = "Stop Stack";
    const DESCRIPTION: &'static str = "Stop a running stack.";
    const HINTS: Hints = Hints::MUTATING;
    const OUTPUT: Option<Output> = Some(Output::UPDATE);
    type Params = StackIdParams;

    fn plan(params: StackIdParams) -> Result<RemoteCall, ToolError> {
        StackOp::Stop(params).into_call()
    }
}

pub struct RestartStackTool;

impl OperationTool for RestartStackTool {
    const NAME: &'static str = "restart_stack";
    const TITLE: &'static str = "Restart Stack";
    const DESCRIPTION: &'static str = "Restart every service of a stack.";
    const HINTS: Hints = Hints::MUTATING;
    const OUTPUT: Option<Output> = Some(Output::UPDATE);
    type Params = StackIdParams;

    fn plan(params: StackIdParams) -> Result<RemoteCall, ToolError> {
        StackOp::Restart(params).into_call()
    }
}

pub struct DestroyStackTool;

impl OperationTool for DestroyStackTool {
    const NAME: &'static str = "destroy_stack";
    const TITLE: &'static str = "Destroy Stack";
    const DESCRIPTION: &'static str =
        "Destroy a stack's containers (docker compose down). The stack definition is kept.";
    const HINTS: Hints = Hints::DESTRUCTIVE;
    const OUTPUT: Option<Output> = Some(Output::UPDATE);
    type Params = StackIdParams;

    fn plan(params: StackIdParams) -> Result<RemoteCall, ToolError> {
        StackOp::Destroy(params).into_call()
    }
}

pub struct DeleteStackTool;

impl OperationTool for DeleteStackTool {
    const NAME: &'static str = "delete_stack";
    const TITLE: &'static str = "Delete Stack";
    const DESCRIPTION: &'static str = "Delete a stack from Komodo.";
    const HINTS: Hints = Hints::DESTRUCTIVE;
    const OUTPUT: Option<Output> = Some(Output::DELETED);
    type Params = StackIdParams;

    fn plan(params: StackIdParams) -> Result<RemoteCall, ToolError> {
        StackOp::Delete(params).into_call()
    }
}

/// Stack hub.
pub struct StackOpsTool;

impl OperationTool for StackOpsTool {
    const NAME: &'static str = "komodo_stack_ops";
    const TITLE: &'static str = "Komodo Stack Operations";
    const DESCRIPTION: &'static str = "Docker Compose stack hub. Operations: list, get, deploy, start, stop, restart, destroy (compose down), delete.";
    const HINTS: Hints = Hints::DESTRUCTIVE;
    type Params = StackOpsParams;

    fn plan(params: StackOpsParams) -> Result<RemoteCall, ToolError> {
        params.into_op()?.into_call()
    }
}
