//! Build tools.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;

use super::common::{Hints, NoParams, OperationTool, Output, RemoteCall, require};
use crate::domains::tools::error::ToolError;

/// Parameters targeting one build.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct BuildIdParams {
    /// Build ID or name.
    pub build_id: String,
}

/// Operations offered by the build hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BuildOperation {
    List,
    Get,
    Run,
    Cancel,
    Delete,
}

impl BuildOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Get => "get",
            Self::Run => "run",
            Self::Cancel => "cancel",
            Self::Delete => "delete",
        }
    }
}

/// Parameters for the build hub.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct BuildOpsParams {
    /// Operation to perform.
    pub operation: BuildOperation,

    /// Build ID (required for get, run, cancel, delete).
    pub build_id: Option<String>,
}

impl BuildOpsParams {
    pub fn into_op(self) -> Result<BuildOp, ToolError> {
        if self.operation == BuildOperation::List {
            return Ok(BuildOp::List);
        }
        let target = BuildIdParams {
            build_id: require(self.operation.as_str(), "build_id", self.build_id)?,
        };
        Ok(match self.operation {
            BuildOperation::List => BuildOp::List,
            BuildOperation::Get => BuildOp::Get(target),
            BuildOperation::Run => BuildOp::Run(target),
            BuildOperation::Cancel => BuildOp::Cancel(target),
            BuildOperation::Delete => BuildOp::Delete(target),
        })
    }
}

/// One build operation, validated and ready to send.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildOp {
    List,
    Get(BuildIdParams),
    Run(BuildIdParams),
    Cancel(BuildIdParams),
    Delete(BuildIdParams),
}

impl BuildOp {
    pub fn into_call(self) -> Result<RemoteCall, ToolError> {
        Ok(match self {
            Self::List => RemoteCall::read("ListBuilds", json!({})).reply("builds"),
            Self::Get(p) => RemoteCall::read("GetBuild", json!({ "build": p.build_id })).reply("build"),
            Self::Run(p) => RemoteCall::execute("RunBuild", json!({ "build": p.build_id })),
            Self::Cancel(p) => RemoteCall::execute("CancelBuild", json!({ "build": p.build_id })),
            Self::Delete(p) => {
                let message = format!("Build '{}' deleted successfully", p.build_id);
                RemoteCall::write("DeleteBuild", json!({ "id": p.build_id })).confirm(message)
            }
        })
    }
}

pub struct ListBuildsTool;

impl OperationTool for ListBuildsTool {
    const NAME: &'static str = "list_builds";
    const TITLE: &'static str = "List Builds";
    const DESCRIPTION: &'static str = "List all builds in Komodo.";
    const HINTS: Hints = Hints::READ;
    const OUTPUT: Option<Output> = Some(Output::list("builds"));
    type Params = NoParams;

    fn plan(_: NoParams) -> Result<RemoteCall, ToolError> {
        BuildOp::List.into_call()
    }
}

pub struct GetBuildTool;

impl OperationTool for GetBuildTool {
    const NAME: &'static str = "get_build";
    const TITLE: &'static str = "Get Build";
    const DESCRIPTION: &'static str = "Get detailed information about a specific build.";
    const HINTS: Hints = Hints::READ;
    const OUTPUT: Option<Output> = Some(Output::item("build"));
    type Params = BuildIdParams;

    fn plan(params: BuildIdParams) -> Result<RemoteCall, ToolError> {
        BuildOp::Get(params).into_call()
    }
}

pub struct RunBuildTool;

impl OperationTool for RunBuildTool {
    const NAME: &'static str = "run_build";
    const TITLE: &'static str = "Run Build";
    const DESCRIPTION: &'static str = "Start a build.";
    const HINTS: Hints = Hints::MUTATING;
    const OUTPUT: Option<Output> = Some(Output::UPDATE);
    type Params = BuildIdParams;

    fn plan(params: BuildIdParams) -> Result<RemoteCall, ToolError> {
        BuildOp::Run(params).into_call()
    }
}

pub struct CancelBuildTool;

impl OperationTool for CancelBuildTool {
    const NAME: &'static str = "cancel_build";
    const TITLE: &'static str = "Cancel Build";
    const DESCRIPTION: &'static str = "Cancel a build in progress.";
    const HINTS: Hints = Hints::MUTATING;
    const OUTPUT: Option<Output> = Some(Output::UPDATE);
    type Params = BuildIdParams;

    fn plan(params: BuildIdParams) -> Result<RemoteCall, ToolError> {
        BuildOp::Cancel(params).into_call()
    }
}

pub struct DeleteBuildTool;

impl OperationTool for DeleteBuildTool {
    const NAME: &'static str = "delete_build";
    const TITLE: &'static str = "Delete Build";
    const DESCRIPTION: &'static str = "Delete a build from Komodo.";
    const HINTS: Hints = Hints::DESTRUCTIVE;
    const OUTPUT: Option<Output> = Some(Output::DELETED);
    type Params = BuildIdParams;

    fn plan(params: BuildIdParams) -> Result<RemoteCall, ToolError> {
        BuildOp::Delete(params).into_call()
    }
}

/// Build hub.
pub struct BuildOpsTool;

impl OperationTool for BuildOpsTool {
    const NAME: &'static str = "komodo_build_ops";
    const TITLE: &'static str = "Komodo Build Operations";
    const DESCRIPTION: &'static str =
        "Build management hub. Operations: list, get, run (start a build), cancel, delete.";
    const HINTS: Hints = Hints::DESTRUCTIVE;
    type Params = BuildOpsParams;

    fn plan(params: BuildOpsParams) -> Result<RemoteCall, ToolError> {
        params.into_op()?.into_call()
    }
}
