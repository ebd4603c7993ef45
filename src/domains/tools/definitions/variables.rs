//! Variable tools.
//!
//! Variable values may legitimately be empty, so `value` only has to be
//! present, unlike names and IDs.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::common::{Hints, NoParams, OperationTool, Output, RemoteCall, present, require, to_params};
use crate::domains::tools::error::ToolError;

/// Parameters targeting one variable.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct VariableIdParams {
    /// Variable ID or name.
    pub variable_id: String,
}

/// Parameters for creating a variable.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct CreateVariableParams {
    /// Variable name.
    pub name: String,

    /// Variable value.
    pub value: String,

    /// Variable description.
    pub description: Option<String>,

    /// Whether the value is secret and hidden from non-admins (default: false).
    pub is_secret: Option<bool>,

    /// Tags for the variable.
    pub tags: Option<Vec<String>>,
}

/// Parameters for changing a variable's value.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct UpdateVariableValueParams {
    /// Variable ID or name.
    pub variable_id: String,

    /// New value.
    pub value: String,
}

/// Operations offered by the variable hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum VariableOperation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl VariableOperation {
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

/// Parameters for the variable hub.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct VariableOpsParams {
    /// Operation to perform.
    pub operation: VariableOperation,

    /// Variable ID (required for get, update, delete).
    pub variable_id: Option<String>,

    /// Variable name (required for create).
    pub name: Option<String>,

    /// Variable value (required for create, update).
    pub value: Option<String>,

    /// Variable description.
    pub description: Option<String>,

    /// Whether this is a secret variable.
    pub is_secret: Option<bool>,

    /// Tags for the variable.
    pub tags: Option<Vec<String>>,
}

impl VariableOpsParams {
    pub fn into_op(self) -> Result<VariableOp, ToolError> {
        let op = self.operation.as_str();
        Ok(match self.operation {
            VariableOperation::List => VariableOp::List,
            VariableOperation::Get => VariableOp::Get(VariableIdParams {
                variable_id: require(op, "variable_id", self.variable_id)?,
            }),
            VariableOperation::Create => match (present(self.name), self.value) {
                (Some(name), Some(value)) => VariableOp::Create(CreateVariableParams {
                    name,
                    value,
                    description: self.description,
                    is_secret: self.is_secret,
                    tags: self.tags,
                }),
                (name, value) => {
                    return Err(ToolError::missing(
                        op,
                        [("name", name.is_none()), ("value", value.is_none())],
                    ));
                }
            },
            VariableOperation::Update => match (present(self.variable_id), self.value) {
                (Some(variable_id), Some(value)) => {
                    VariableOp::Update(UpdateVariableValueParams { variable_id, value })
                }
                (variable_id, value) => {
                    return Err(ToolError::missing(
                        op,
                        [
                            ("variable_id", variable_id.is_none()),
                            ("value", value.is_none()),
                        ],
                    ));
                }
            },
            VariableOperation::Delete => VariableOp::Delete(VariableIdParams {
                variable_id: require(op, "variable_id", self.variable_id)?,
            }),
        })
    }
}

#[derive(Debug, Serialize)]
struct CreateVariableBody {
    name: String,
    value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    is_secret: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<Vec<String>>,
}

/// One variable operation, validated and ready to send.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableOp {
    List,
    Get(VariableIdParams),
    Create(CreateVariableParams),
    Update(UpdateVariableValueParams),
    Delete(VariableIdParams),
}

impl VariableOp {
    pub fn into_call(self) -> Result<RemoteCall, ToolError> {
        Ok(match self {
            Self::List => RemoteCall::read("ListVariables", json!({})).reply("variables"),
            Self::Get(p) => RemoteCall::read("GetVariable", json!({ "variable": p.variable_id }))
                .reply("variable"),
            Self::Create(p) => {
                let message = format!("Variable '{}' created successfully", p.name);
                let body = CreateVariableBody {
                    name: p.name,
                    value: p.value,
                    description: p.description,
                    is_secret: p.is_secret.unwrap_or(false),
                    tags: p.tags,
                };
                RemoteCall::write("CreateVariable", to_params(&body)?)
                    .reply("variable")
                    .confirm(message)
            }
            Self::Update(p) => {
                let message = format!("Variable '{}' updated successfully", p.variable_id);
                RemoteCall::write(
                    "UpdateVariableValue",
                    json!({ "id": p.variable_id, "value": p.value }),
                )
                .reply("variable")
                .confirm(message)
            }
            Self::Delete(p) => {
                let message = format!("Variable '{}' deleted successfully", p.variable_id);
                RemoteCall::write("DeleteVariable", json!({ "id": p.variable_id })).confirm(message)
            }
        })
    }
}

pub struct ListVariablesTool;

impl OperationTool for ListVariablesTool {
    const NAME: &'static str = "list_variables";
    const TITLE: &'static str = "List Variables";
    const DESCRIPTION: &'static str = "List all variables defined in Komodo.";
    const HINTS: Hints = Hints::READ;
    const OUTPUT: Option<Output> = Some(Output::list("variables"));
    type Params = NoParams;

    fn plan(_: NoParams) -> Result<RemoteCall, ToolError> {
        VariableOp::List.into_call()
    }
}

pub struct GetVariableTool;

impl OperationTool for GetVariableTool {
    const NAME: &'static str = "get_variable";
    const TITLE: &'static str = "Get Variable";
    const DESCRIPTION: &'static str = "Get a specific variable.";
    const HINTS: Hints = Hints::READ;
    const OUTPUT: Option<Output> = Some(Output::item("variable"));
    type Params = VariableIdParams;

    fn plan(params: VariableIdParams) -> Result<RemoteCall, ToolError> {
        VariableOp::Get(params).into_call()
    }
}

pub struct CreateVariableTool;

impl OperationTool for CreateVariableTool {
    const NAME: &'static str = "create_variable";
    const TITLE: &'static str = "Create Variable";
    const DESCRIPTION: &'static str = "Create a new variable. Variables are not secret unless `is_secret` is true.";
    const HINTS: Hints = Hints::MUTATING;
    const OUTPUT: Option<Output> = Some(Output::confirmed("variable"));
    const ALLOW_BLANK: &'static [&'static str] = &["value"];
    type Params = CreateVariableParams;

    fn plan(params: CreateVariableParams) -> Result<RemoteCall, ToolError> {
        VariableOp::Create(params).into_call()
    }
}

pub struct UpdateVariableValueTool;

impl OperationTool for UpdateVariableValueTool {
    const NAME: &'static str = "update_variable_value";
    const TITLE: &'static str = "Update Variable Value";
    const DESCRIPTION: &'static str = "Change the value of an existing variable.";
    const HINTS: Hints = Hints::MUTATING;
    const OUTPUT: Option<Output> = Some(Output::confirmed("variable"));
    const ALLOW_BLANK: &'static [&'static str] = &["value"];
    type Params = UpdateVariableValueParams;

    fn plan(params: UpdateVariableValueParams) -> Result<RemoteCall, ToolError> {
        VariableOp::Update(params).into_call()
    }
}

pub struct DeleteVariableTool;

impl OperationTool for DeleteVariableTool {
    const NAME: &'static str = "delete_variable";
    const TITLE: &'static str = "Delete Variable";
    const DESCRIPTION: &'static str = "Delete a variable from Komodo.";
    const HINTS: Hints = Hints::DESTRUCTIVE;
    const OUTPUT: Option<Output> = Some(Output::DELETED);
    type Params = VariableIdParams;

    fn plan(params: VariableIdParams) -> Result<RemoteCall, ToolError> {
        VariableOp::Delete(params).into_call()
    }
}

/// Variable hub.
pub struct VariableOpsTool;

impl OperationTool for VariableOpsTool {
    const NAME: &'static str = "komodo_variable_ops";
    const TITLE: &'static str = "Komodo Variable Operations";
    const DESCRIPTION: &'static str = "Variable management hub. Operations: list, get, create (name and value required), update (change value), delete.";
    const HINTS: Hints = Hints::DESTRUCTIVE;
    type Params = VariableOpsParams;

    fn plan(params: VariableOpsParams) -> Result<RemoteCall, ToolError> {
        params.into_op()?.into_call()
    }
}
