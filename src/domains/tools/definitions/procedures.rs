//! Procedure tools.
//!
//! A procedure is an ordered list of stages; each stage runs its
//! executions in parallel. Executions are passed through untouched.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::common::{Hints, NoParams, OperationTool, Output, RemoteCall, present, require, to_params};
use crate::domains::tools::error::ToolError;

/// One stage of a procedure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProcedureStage {
    /// Stage name.
    pub name: String,

    /// Whether the stage runs (default: true).
    #[serde(default = "stage_enabled_default")]
    pub enabled: bool,

    /// Executions run by this stage, in Komodo's execution format.
    pub executions: Vec<Value>,
}

fn stage_enabled_default() -> bool {
    true
}

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters addressing a procedure by name.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct ProcedureNameParams {
    /// Procedure name or ID.
    pub procedure_name: String,
}

/// Parameters targeting a procedure by ID.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct ProcedureIdParams {
    /// Procedure ID.
    pub procedure_id: String,
}

/// Parameters for creating a procedure.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct CreateProcedureParams {
    /// Procedure name.
    pub name: String,

    /// Stages, run in order.
    pub stages: Vec<ProcedureStage>,

    /// Tags for the procedure.
    pub tags: Option<Vec<String>>,
}

/// Parameters for updating a procedure.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct UpdateProcedureParams {
    /// Procedure ID.
    pub procedure_id: String,

    /// Partial procedure configuration, sent as-is.
    pub config: Option<Map<String, Value>>,

    /// New tags.
    pub tags: Option<Vec<String>>,
}

/// Operations offered by the procedure hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProcedureOperation {
    List,
    Get,
    Create,
    Update,
    Run,
    Delete,
}

impl ProcedureOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Get => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Run => "run",
            Self::Delete => "delete",
        }
    }
}

/// Parameters for the procedure hub.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ProcedureOpsParams {
    /// Operation to perform.
    pub operation: ProcedureOperation,

    /// Procedure ID or name (required for get, update, run, delete).
    pub procedure_id: Option<String>,

    /// Procedure name (required for create).
    pub name: Option<String>,

    /// Stages (required for create).
    pub stages: Option<Vec<ProcedureStage>>,

    /// Partial procedure configuration for update.
    pub config: Option<Map<String, Value>>,

    /// Tags for the procedure.
    pub tags: Option<Vec<String>>,
}

impl ProcedureOpsParams {
    pub fn into_op(self) -> Result<ProcedureOp, ToolError> {
        let op = self.operation.as_str();
        Ok(match self.operation {
            ProcedureOperation::List => ProcedureOp::List,
            ProcedureOperation::Get => ProcedureOp::Get(ProcedureNameParams {
                procedure_name: require(op, "procedure_id", self.procedure_id)?,
            }),
            ProcedureOperation::Create => match (present(self.name), self.stages) {
                (Some(name), Some(stages)) => ProcedureOp::Create(CreateProcedureParams {
                    name,
                    stages,
                    tags: self.tags,
                }),
                (name, stages) => {
                    return Err(ToolError::missing(
                        op,
                        [("name", name.is_none()), ("stages", stages.is_none())],
                    ));
                }
            },
            ProcedureOperation::Update => ProcedureOp::Update(UpdateProcedureParams {
                procedure_id: require(op, "procedure_id", self.procedure_id)?,
                config: self.config,
                tags: self.tags,
            }),
            ProcedureOperation::Run => ProcedureOp::Run(ProcedureNameParams {
                procedure_name: require(op, "procedure_id", self.procedure_id)?,
            }),
            ProcedureOperation::Delete => ProcedureOp::Delete(ProcedureIdParams {
                procedure_id: require(op, "procedure_id", self.procedure_id)?,
            }),
        })
    }
}

// ============================================================================
// Remote Payloads
// ============================================================================

#[derive(Debug, Serialize)]
struct ProcedureConfigBody {
    stages: Vec<ProcedureStage>,
}

#[derive(Debug, Serialize)]
struct CreateProcedureBody {
    name: String,
    config: ProcedureConfigBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct UpdateProcedureBody {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<Vec<String>>,
}

// ============================================================================
// Canonical Operation
// ============================================================================

/// One procedure operation, validated and ready to send.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcedureOp {
    List,
    Get(ProcedureNameParams),
    Create(CreateProcedureParams),
    Update(UpdateProcedureParams),
    Run(ProcedureNameParams),
    Delete(ProcedureIdParams),
}

impl ProcedureOp {
    pub fn into_call(self) -> Result<RemoteCall, ToolError> {
        Ok(match self {
            Self::List => RemoteCall::read("ListProcedures", json!({})).reply("procedures"),
            Self::Get(p) => {
                RemoteCall::read("GetProcedure", json!({ "procedure": p.procedure_name }))
                    .reply("procedure")
            }
            Self::Create(p) => {
                let message = format!("Procedure '{}' created successfully", p.name);
                let body = CreateProcedureBody {
                    name: p.name,
                    config: ProcedureConfigBody { stages: p.stages },
                    tags: p.tags,
                };
                RemoteCall::write("CreateProcedure", to_params(&body)?)
                    .reply("procedure")
                    .confirm(message)
            }
            Self::Update(p) => {
                let message = format!("Procedure '{}' updated successfully", p.procedure_id);
                let body = UpdateProcedureBody {
                    id: p.procedure_id,
                    config: p.config,
                    tags: p.tags,
                };
                RemoteCall::write("UpdateProcedure", to_params(&body)?)
                    .reply("procedure")
                    .confirm(message)
            }
            Self::Run(p) => {
                RemoteCall::execute("RunProcedure", json!({ "procedure": p.procedure_name }))
            }
            Self::Delete(p) => {
                let message = format!("Procedure '{}' deleted successfully", p.procedure_id);
                RemoteCall::write("DeleteProcedure", json!({ "id": p.procedure_id }))
                    .confirm(message)
            }
        })
    }
}

// ============================================================================
// Tool Definitions
// ============================================================================

pub struct ListProceduresTool;

impl OperationTool for ListProceduresTool {
    const NAME: &'static str = "list_procedures";
    const TITLE: &'static str = "List Procedures";
    const DESCRIPTION: &'static str = "List all procedures defined in Komodo.";
    const HINTS: Hints = Hints::READ;
    const OUTPUT: Option<Output> = Some(Output::list("procedures"));
    type Params = NoParams;

    fn plan(_: NoParams) -> Result<RemoteCall, ToolError> {
        ProcedureOp::List.into_call()
    }
}

pub struct GetProcedureInfoTool;

impl OperationTool for GetProcedureInfoTool {
    const NAME: &'static str = "get_procedure_info";
    const TITLE: &'static str = "Get Procedure Info";
    const DESCRIPTION: &'static str = "Get detailed information about a specific procedure.";
    const HINTS: Hints = Hints::READ;
    const OUTPUT: Option<Output> = Some(Output::item("procedure"));
    type Params = ProcedureNameParams;

    fn plan(params: ProcedureNameParams) -> Result<RemoteCall, ToolError> {
        ProcedureOp::Get(params).into_call()
    }
}

pub struct CreateProcedureTool;

impl OperationTool for CreateProcedureTool {
    const NAME: &'static str = "create_procedure";
    const TITLE: &'static str = "Create Procedure";
    const DESCRIPTION: &'static str = "Create a procedure from a list of stages. Stages are enabled unless `enabled` is false.";
    const HINTS: Hints = Hints::MUTATING;
    const OUTPUT: Option<Output> = Some(Output::confirmed("procedure"));
    type Params = CreateProcedureParams;

    fn plan(params: CreateProcedureParams) -> Result<RemoteCall, ToolError> {
        ProcedureOp::Create(params).into_call()
    }
}

pub struct UpdateProcedureTool;

impl OperationTool for UpdateProcedureTool {
    const NAME: &'static str = "update_procedure";
    const TITLE: &'static str = "Update Procedure";
    const DESCRIPTION: &'static str = "Update a procedure's configuration or tags.";
    const HINTS: Hints = Hints::MUTATING;
    const OUTPUT: Option<Output> = Some(Output::confirmed("procedure"));
    type Params = UpdateProcedureParams;

    fn plan(params: UpdateProcedureParams) -> Result<RemoteCall, ToolError> {
        ProcedureOp::Update(params).into_call()
    }
}

pub struct RunProcedureTool;

impl OperationTool for RunProcedureTool {
    const NAME: &'static str = "run_procedure";
    const TITLE: &'static str = "Run Procedure";
    const DESCRIPTION: &'static str = "Run a procedure.";
    const HINTS: Hints = Hints::MUTATING;
    const OUTPUT: Option<Output> = Some(Output::UPDATE);
    type Params = ProcedureNameParams;

    fn plan(params: ProcedureNameParams) -> Result<RemoteCall, ToolError> {
        ProcedureOp::Run(params).into_call()
    }
}

pub struct DeleteProcedureTool;

impl OperationTool for DeleteProcedureTool {
    const NAME: &'static str = "delete_procedure";
    const TITLE: &'static str = "Delete Procedure";
    const DESCRIPTION: &'static str = "Delete a procedure from Komodo.";
    const HINTS: Hints = Hints::DESTRUCTIVE;
    const OUTPUT: Option<Output> = Some(Output::DELETED);
    type Params = ProcedureIdParams;

    fn plan(params: ProcedureIdParams) -> Result<RemoteCall, ToolError> {
        ProcedureOp::Delete(params).into_call()
    }
}

/// Procedure hub.
pub struct ProcedureOpsTool;

impl OperationTool for ProcedureOpsTool {
    const NAME: &'static str = "komodo_procedure_ops";
    const TITLE: &'static str = "Komodo Procedure Operations";
    const DESCRIPTION: &'static str = "Procedure hub. Operations: list, get, create (name and stages required), update, run, delete.";
    const HINTS: Hints = Hints::DESTRUCTIVE;
    type Params = ProcedureOpsParams;

    fn plan(params: ProcedureOpsParams) -> Result<RemoteCall, ToolError> {
        params.into_op()?.into_call()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::komodo::Verb;
    use crate::domains::tools::definitions::testing::{assert_same_call, rejected, single_call};

    #[tokio::test]
    async fn test_create_procedure_stage_defaults() {
        let call = single_call::<CreateProcedureTool>(json!({
            "name": "release",
            "stages": [
                { "name": "build", "executions": [{ "type": "RunBuild", "params": { "build": "api" } }] },
                { "name": "deploy", "enabled": false, "executions": [] }
            ]
        }))
        .await;

        assert_eq!(call.operation, "CreateProcedure");
        assert_eq!(
            call.params,
            json!({
                "name": "release",
                "config": {
                    "stages": [
                        {
                            "name": "build",
                            "enabled": true,
                            "executions": [{ "type": "RunBuild", "params": { "build": "api" } }]
                        },
                        { "name": "deploy", "enabled": false, "executions": [] }
                    ]
                }
            })
        );
    }

    #[tokio::test]
    async fn test_run_procedure() {
        let call = single_call::<RunProcedureTool>(json!({ "procedure_name": "release" })).await;
        assert_eq!(call.verb, Verb::Execute);
        assert_eq!(call.params, json!({ "procedure": "release" }));
    }

    #[tokio::test]
    async fn test_hub_matches_operation_tools() {
        assert_same_call::<RunProcedureTool, ProcedureOpsTool>(
            json!({ "procedure_name": "release" }),
            json!({ "operation": "run", "procedure_id": "release" }),
        )
        .await;
        assert_same_call::<UpdateProcedureTool, ProcedureOpsTool>(
            json!({ "procedure_id": "p1", "config": { "schedule": "0 0 * * *" } }),
            json!({ "operation": "update", "procedure_id": "p1", "config": { "schedule": "0 0 * * *" } }),
        )
        .await;
        assert_same_call::<CreateProcedureTool, ProcedureOpsTool>(
            json!({ "name": "noop", "stages": [] }),
            json!({ "operation": "create", "name": "noop", "stages": [] }),
        )
        .await;
    }

    #[tokio::test]
    async fn test_hub_missing_fields() {
        let text = rejected::<ProcedureOpsTool>(json!({ "operation": "create", "name": "x" })).await;
        assert_eq!(text, "Error: `stages` is required for create operation");
    }
}
