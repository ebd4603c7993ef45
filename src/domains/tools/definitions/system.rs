//! System-wide read-only tools: update history, core info, version, secrets.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::common::{Hints, NoParams, OperationTool, Output, RemoteCall, to_params};
use crate::domains::tools::error::ToolError;

/// Parameters for listing updates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ListUpdatesParams {
    /// Page of results, starting at 0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

/// Operations offered by the system hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SystemOperation {
    Updates,
    Info,
    Version,
    Secrets,
}

/// Parameters for the system hub.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SystemOpsParams {
    /// Operation to perform.
    pub operation: SystemOperation,

    /// Page of results (updates only).
    pub page: Option<u32>,
}

impl SystemOpsParams {
    pub fn into_op(self) -> SystemOp {
        match self.operation {
            SystemOperation::Updates => SystemOp::Updates(ListUpdatesParams { page: self.page }),
            SystemOperation::Info => SystemOp::Info,
            SystemOperation::Version => SystemOp::Version,
            SystemOperation::Secrets => SystemOp::Secrets,
        }
    }
}

/// One system query.
#[derive(Debug, Clone, PartialEq)]
pub enum SystemOp {
    Updates(ListUpdatesParams),
    Info,
    Version,
    Secrets,
}

impl SystemOp {
    pub fn into_call(self) -> Result<RemoteCall, ToolError> {
        Ok(match self {
            Self::Updates(p) => RemoteCall::read("ListUpdates", to_params(&p)?).reply("updates"),
            Self::Info => RemoteCall::read("GetCoreInfo", json!({})).reply("info"),
            Self::Version => RemoteCall::read("GetVersion", json!({})).reply("version"),
            Self::Secrets => RemoteCall::read("ListSecrets", json!({})).reply("secrets"),
        })
    }
}

pub struct ListUpdatesTool;

impl OperationTool for ListUpdatesTool {
    const NAME: &'static str = "list_updates";
    const TITLE: &'static str = "List Updates";
    const DESCRIPTION: &'static str = "List recent updates (the history of actions run by Komodo).";
    const HINTS: Hints = Hints::READ;
    const OUTPUT: Option<Output> = Some(Output::item("updates"));
    type Params = ListUpdatesParams;

    fn plan(params: ListUpdatesParams) -> Result<RemoteCall, ToolError> {
        SystemOp::Updates(params).into_call()
    }
}

pub struct GetSystemInfoTool;

impl OperationTool for GetSystemInfoTool {
    const NAME: &'static str = "get_system_info";
    const TITLE: &'static str = "Get System Info";
    const DESCRIPTION: &'static str = "Get information about the Komodo core.";
    const HINTS: Hints = Hints::READ;
    const OUTPUT: Option<Output> = Some(Output::item("info"));
    type Params = NoParams;

    fn plan(_: NoParams) -> Result<RemoteCall, ToolError> {
        SystemOp::Info.into_call()
    }
}

pub struct GetVersionTool;

impl OperationTool for GetVersionTool {
    const NAME: &'static str = "get_version";
    const TITLE: &'static str = "Get Version";
    const DESCRIPTION: &'static str = "Get the version of the Komodo core.";
    const HINTS: Hints = Hints::READ;
    const OUTPUT: Option<Output> = Some(Output::item("version"));
    type Params = NoParams;

    fn plan(_: NoParams) -> Result<RemoteCall, ToolError> {
        SystemOp::Version.into_call()
    }
}

pub struct ListSecretsTool;

impl OperationTool for ListSecretsTool {
    const NAME: &'static str = "list_secrets";
    const TITLE: &'static str = "List Secrets";
    const DESCRIPTION: &'static str = "List the names of secrets available to the core (values are never returned).";
    const HINTS: Hints = Hints::READ;
    const OUTPUT: Option<Output> = Some(Output::list("secrets"));
    type Params = NoParams;

    fn plan(_: NoParams) -> Result<RemoteCall, ToolError> {
        SystemOp::Secrets.into_call()
    }
}

/// System hub.
pub struct SystemOpsTool;

impl OperationTool for SystemOpsTool {
    const NAME: &'static str = "komodo_system_ops";
    const TITLE: &'static str = "Komodo System Operations";
    const DESCRIPTION: &'static str =
        "System information hub. Operations: updates (recent updates, optional page), info (core info), version, secrets (secret names).";
    const HINTS: Hints = Hints::READ;
    type Params = SystemOpsParams;

    fn plan(params: SystemOpsParams) -> Result<RemoteCall, ToolError> {
        params.into_op().into_call()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::komodo::Verb;
    use crate::domains::komodo::testing::RecordingClient;
    use crate::domains::tools::definitions::testing::{assert_same_call, payload, run, single_call};

    #[tokio::test]
    async fn test_list_updates_page_is_optional() {
        let call = single_call::<ListUpdatesTool>(json!({})).await;
        assert_eq!(call.verb, Verb::Read);
        assert_eq!(call.params, json!({}));

        let call = single_call::<ListUpdatesTool>(json!({ "page": 2 })).await;
        assert_eq!(call.params, json!({ "page": 2 }));
    }

    #[tokio::test]
    async fn test_version_reply() {
        let stub = RecordingClient::returning(json!({ "version": "1.17.0" }));
        let result = run::<GetVersionTool>(&stub, json!({})).await;
        assert_eq!(payload(&result), &json!({ "version": { "version": "1.17.0" } }));
    }

    #[tokio::test]
    async fn test_hub_matches_operation_tools() {
        assert_same_call::<ListUpdatesTool, SystemOpsTool>(
            json!({ "page": 1 }),
            json!({ "operation": "updates", "page": 1 }),
        )
        .await;
        assert_same_call::<GetSystemInfoTool, SystemOpsTool>(json!({}), json!({ "operation": "info" }))
            .await;
        assert_same_call::<GetVersionTool, SystemOpsTool>(
            json!({}),
            json!({ "operation": "version" }),
        )
        .await;
        assert_same_call::<ListSecretsTool, SystemOpsTool>(
            json!({}),
            json!({ "operation": "secrets" }),
        )
        .await;
    }
}
