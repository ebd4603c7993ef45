//! Tool Registry - the ordered catalog of every advertised tool.
//!
//! This module provides:
//! - [`ToolEntry`]: a tool's MCP metadata paired with its handler
//! - [`ToolRegistry`]: the catalog for one presentation mode, built once
//!   at startup and never mutated afterwards
//!
//! Registration order is domain order (servers, deployments, stacks, builds,
//! repos, containers, variables, alerters, procedures, system), per-operation
//! tools before hubs.

use futures::FutureExt;
use futures::future::BoxFuture;
use rmcp::model::{CallToolResult, JsonObject, Tool};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::core::config::ToolMode;
use crate::domains::komodo::ClientAccessor;

use super::definitions::*;
use super::error::ToolError;

/// Async handler invoked with the call arguments and the shared client accessor.
pub type ToolHandler =
    Arc<dyn Fn(JsonObject, Arc<ClientAccessor>) -> BoxFuture<'static, CallToolResult> + Send + Sync>;

// ============================================================================
// Tool Entry
// ============================================================================

/// One registered tool.
#[derive(Clone)]
pub struct ToolEntry {
    tool: Tool,
    handler: ToolHandler,
}

impl ToolEntry {
    /// Entry for an [`OperationTool`].
    pub fn of<T: OperationTool>() -> Self {
        Self {
            tool: T::to_tool(),
            handler: Arc::new(|arguments: JsonObject, accessor: Arc<ClientAccessor>| {
                execute_tool::<T>(arguments, accessor).boxed()
            }),
        }
    }

    /// Entry with a custom handler.
    pub fn new(tool: Tool, handler: ToolHandler) -> Self {
        Self { tool, handler }
    }

    pub fn name(&self) -> &str {
        &self.tool.name
    }

    pub fn tool(&self) -> &Tool {
        &self.tool
    }
}

impl std::fmt::Debug for ToolEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolEntry")
            .field("name", &self.tool.name)
            .finish_non_exhaustive()
    }
}

/// Every per-operation tool, in registration order.
pub fn operation_tools() -> Vec<ToolEntry> {
    vec![
        // Servers
        ToolEntry::of::<ListServersTool>(),
        ToolEntry::of::<GetServerInfoTool>(),
        ToolEntry::of::<CreateServerTool>(),
        ToolEntry::of::<UpdateServerTool>(),
        ToolEntry::of::<DeleteServerTool>(),
        ToolEntry::of::<RenameServerTool>(),
        // Deployments
        ToolEntry::of::<ListDeploymentsTool>(),
        ToolEntry::of::<GetDeploymentTool>(),
        ToolEntry::of::<CreateDeploymentTool>(),
        ToolEntry::of::<UpdateDeploymentTool>(),
        ToolEntry::of::<DeployTool>(),
        ToolEntry::of::<StartDeploymentTool>(),
        ToolEntry::of::<StopDeploymentTool>(),
        ToolEntry::of::<RestartDeploymentTool>(),
        ToolEntry::of::<DeleteDeploymentTool>(),
        // Stacks
        ToolEntry::of::<ListStacksTool>(),
        ToolEntry::of::<GetStackTool>(),
        ToolEntry::of::<DeployStackTool>(),
        ToolEntry::of::<StartStackTool>(),
        ToolEntry::of::<StopStackTool>(),
        ToolEntry::of::<RestartStackTool>(),
        ToolEntry::of::<DestroyStackTool>(),
        ToolEntry::of::<DeleteStackTool>(),
        // Builds
        ToolEntry::of::<ListBuildsTool>(),
        ToolEntry::of::<GetBuildTool>(),
        ToolEntry::of::<RunBuildTool>(),
        ToolEntry::of::<CancelBuildTool>(),
        ToolEntry::of::<DeleteBuildTool>(),
        // Repos
        ToolEntry::of::<ListReposTool>(),
        ToolEntry::of::<GetRepoTool>(),
        ToolEntry::of::<CreateRepoTool>(),
        ToolEntry::of::<CloneRepoTool>(),
        ToolEntry::of::<PullRepoTool>(),
        ToolEntry::of::<DeleteRepoTool>(),
        // Containers
        ToolEntry::of::<ListDockerContainersTool>(),
        ToolEntry::of::<InspectDockerContainerTool>(),
        ToolEntry::of::<StartContainerTool>(),
        ToolEntry::of::<StopContainerTool>(),
        ToolEntry::of::<RestartContainerTool>(),
        // Variables
        ToolEntry::of::<ListVariablesTool>(),
        ToolEntry::of::<GetVariableTool>(),
        ToolEntry::of::<CreateVariableTool>(),
        ToolEntry::of::<UpdateVariableValueTool>(),
        ToolEntry::of::<DeleteVariableTool>(),
        // Alerters
        ToolEntry::of::<ListAlertersTool>(),
        ToolEntry::of::<GetAlerterInfoTool>(),
        ToolEntry::of::<CreateAlerterTool>(),
        ToolEntry::of::<UpdateAlerterTool>(),
        ToolEntry::of::<DeleteAlerterTool>(),
        // Procedures
        ToolEntry::of::<ListProceduresTool>(),
        ToolEntry::of::<GetProcedureInfoTool>(),
        ToolEntry::of::<CreateProcedureTool>(),
        ToolEntry::of::<UpdateProcedureTool>(),
        ToolEntry::of::<RunProcedureTool>(),
        ToolEntry::of::<DeleteProcedureTool>(),
        // System
        ToolEntry::of::<ListUpdatesTool>(),
        ToolEntry::of::<GetSystemInfoTool>(),
        ToolEntry::of::<GetVersionTool>(),
        ToolEntry::of::<ListSecretsTool>(),
    ]
}

/// One hub per domain, in registration order.
pub fn hub_tools() -> Vec<ToolEntry> {
    vec![
        ToolEntry::of::<ServerOpsTool>(),
        ToolEntry::of::<DeploymentOpsTool>(),
        ToolEntry::of::<StackOpsTool>(),
        ToolEntry::of::<BuildOpsTool>(),
        ToolEntry::of::<RepoOpsTool>(),
        ToolEntry::of::<ContainerOpsTool>(),
        ToolEntry::of::<VariableOpsTool>(),
        ToolEntry::of::<AlerterOpsTool>(),
        ToolEntry::of::<ProcedureOpsTool>(),
        ToolEntry::of::<SystemOpsTool>(),
    ]
}

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - the immutable catalog for one presentation mode.
#[derive(Debug)]
pub struct ToolRegistry {
    entries: Vec<ToolEntry>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Build the catalog for `mode`.
    pub fn new(mode: ToolMode) -> Result<Self, ToolError> {
        let mut entries = Vec::new();
        if mode.includes_operations() {
            entries.extend(operation_tools());
        }
        if mode.includes_hubs() {
            entries.extend(hub_tools());
        }
        Self::from_entries(entries)
    }

    /// Build a catalog from explicit entries. Names must be unique.
    pub fn from_entries(entries: Vec<ToolEntry>) -> Result<Self, ToolError> {
        let mut index = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            if index.insert(entry.name().to_string(), position).is_some() {
                return Err(ToolError::DuplicateTool(entry.name().to_string()));
            }
        }
        debug!("Tool registry built with {} tools", entries.len());
        Ok(Self { entries, index })
    }

    /// Get all tool names, in registration order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.entries.iter().map(ToolEntry::name).collect()
    }

    /// Get all tools as Tool models (metadata), in registration order.
    ///
    /// Every transport lists tools from here.
    pub fn definitions(&self) -> Vec<Tool> {
        self.entries.iter().map(|entry| entry.tool.clone()).collect()
    }

    /// Look up the handler registered under `name`.
    pub fn handler(&self, name: &str) -> Option<ToolHandler> {
        self.index
            .get(name)
            .map(|&position| self.entries[position].handler.clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::komodo::testing::RecordingClient;
    use crate::domains::tools::envelope;
    use serde_json::{Value, json};

    const OPERATION_TOOL_COUNT: usize = 59;
    const HUB_COUNT: usize = 10;

    #[test]
    fn test_registry_modes() {
        let operations = ToolRegistry::new(ToolMode::Operations).unwrap();
        assert_eq!(operations.len(), OPERATION_TOOL_COUNT);
        assert!(!operations.contains("komodo_server_ops"));

        let hubs = ToolRegistry::new(ToolMode::Hub).unwrap();
        assert_eq!(hubs.len(), HUB_COUNT);
        assert!(!hubs.contains("list_servers"));

        let all = ToolRegistry::new(ToolMode::All).unwrap();
        assert_eq!(all.len(), OPERATION_TOOL_COUNT + HUB_COUNT);
    }

    #[test]
    fn test_registry_order() {
        let all = ToolRegistry::new(ToolMode::All).unwrap();
        let names = all.tool_names();
        assert_eq!(names[0], "list_servers");
        assert_eq!(names[OPERATION_TOOL_COUNT - 1], "list_secrets");
        assert_eq!(
            &names[OPERATION_TOOL_COUNT..],
            &[
                "komodo_server_ops",
                "komodo_deployment_ops",
                "komodo_stack_ops",
                "komodo_build_ops",
                "komodo_repo_ops",
                "komodo_container_ops",
                "komodo_variable_ops",
                "komodo_alerter_ops",
                "komodo_procedure_ops",
                "komodo_system_ops",
            ]
        );
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let entries = vec![
            ToolEntry::of::<ListServersTool>(),
            ToolEntry::of::<GetServerInfoTool>(),
            ToolEntry::of::<ListServersTool>(),
        ];
        let err = ToolRegistry::from_entries(entries).unwrap_err();
        assert!(matches!(err, ToolError::DuplicateTool(ref name) if name == "list_servers"));
    }

    #[test]
    fn test_handler_lookup() {
        let registry = ToolRegistry::new(ToolMode::Operations).unwrap();
        assert!(registry.handler("list_servers").is_some());
        assert!(registry.handler("unknown_tool").is_none());
    }

    #[test]
    fn test_output_schema_only_on_operation_tools() {
        for tool in ToolRegistry::new(ToolMode::Operations).unwrap().definitions() {
            assert!(tool.output_schema.is_some(), "{} lacks outputSchema", tool.name);
            assert!(tool.annotations.is_some());
        }
        for tool in ToolRegistry::new(ToolMode::Hub).unwrap().definitions() {
            assert!(tool.output_schema.is_none(), "{} has outputSchema", tool.name);
        }
    }

    #[test]
    fn test_hub_schemas_only_require_operation() {
        for tool in ToolRegistry::new(ToolMode::Hub).unwrap().definitions() {
            let schema = Value::Object((*tool.input_schema).clone());
            assert_eq!(schema["required"], json!(["operation"]), "{}", tool.name);
            assert!(schema["properties"].get("operation").is_some());
        }
    }

    /// Minimal arguments satisfying `required` in an input schema.
    fn sample_arguments(tool: &Tool) -> JsonObject {
        let schema: &JsonObject = &tool.input_schema;
        let required = schema.get("required").and_then(Value::as_array).cloned().unwrap_or_default();
        let properties = schema.get("properties").cloned().unwrap_or(Value::Null);

        let mut arguments = JsonObject::new();
        for field in required.iter().filter_map(Value::as_str) {
            let sample = match properties[field]["type"].as_str() {
                Some("array") => json!([]),
                Some("object") => json!({}),
                Some("boolean") => json!(true),
                Some("integer") | Some("number") => json!(1),
                _ => json!("sample"),
            };
            arguments.insert(field.to_string(), sample);
        }
        arguments
    }

    /// Stub reply matching the declared output shape.
    fn sample_reply(tool: &Tool) -> Value {
        let schema = tool.output_schema.as_ref().map(|s| Value::Object((**s).clone()));
        let is_list = schema
            .as_ref()
            .and_then(|s| s["required"][0].as_str().map(|key| s["properties"][key]["type"] == "array"))
            .unwrap_or(false);
        if is_list { json!([]) } else { json!({ "ok": true }) }
    }

    #[tokio::test]
    async fn test_every_operation_tool_matches_its_output_schema() {
        let registry = ToolRegistry::new(ToolMode::Operations).unwrap();
        for tool in registry.definitions() {
            let stub = RecordingClient::returning(sample_reply(&tool));
            let accessor = Arc::new(ClientAccessor::with_client(stub.clone()));
            let handler = registry.handler(&tool.name).unwrap();

            let result = handler(sample_arguments(&tool), accessor).await;
            assert_eq!(result.is_error, Some(false), "{} failed: {:?}", tool.name, envelope::text_of(&result));
            assert_eq!(stub.calls().len(), 1, "{} must make exactly one call", tool.name);

            let text = envelope::text_of(&result).unwrap();
            let parsed: Value = serde_json::from_str(text).unwrap();
            let output = Value::Object((**tool.output_schema.as_ref().unwrap()).clone());
            for key in output["required"].as_array().unwrap() {
                let key = key.as_str().unwrap();
                assert!(parsed.get(key).is_some(), "{} reply lacks `{}`", tool.name, key);
                if output["properties"][key]["type"] == "array" {
                    assert!(parsed[key].is_array(), "{} `{}` is not a list", tool.name, key);
                }
                if output["properties"][key]["type"] == "string" {
                    assert!(parsed[key].is_string(), "{} `{}` is not a string", tool.name, key);
                }
            }
        }
    }

    #[tokio::test]
    async fn test_missing_required_field_never_reaches_client() {
        let registry = ToolRegistry::new(ToolMode::Operations).unwrap();
        for tool in registry.definitions() {
            let full = sample_arguments(&tool);
            for field in full.keys() {
                let mut arguments = full.clone();
                arguments.remove(field);

                let stub = RecordingClient::new();
                let accessor = Arc::new(ClientAccessor::with_client(stub.clone()));
                let handler = registry.handler(&tool.name).unwrap();
                let result = handler(arguments, accessor).await;

                assert_eq!(result.is_error, Some(true), "{} accepted missing `{}`", tool.name, field);
                assert!(stub.calls().is_empty(), "{} reached the client", tool.name);
                let text = envelope::text_of(&result).unwrap();
                assert!(text.contains(field.as_str()), "{}: {}", tool.name, text);
                assert!(text.contains(&*tool.name), "{}: {}", tool.name, text);
            }
        }
    }

    /// Required strings that may be sent empty (variable values).
    const BLANK_ALLOWED: &[(&str, &str)] = &[
        ("create_variable", "value"),
        ("update_variable_value", "value"),
    ];

    #[tokio::test]
    async fn test_blank_required_field_never_reaches_client() {
        let registry = ToolRegistry::new(ToolMode::Operations).unwrap();
        for tool in registry.definitions() {
            let full = sample_arguments(&tool);
            for (field, value) in full.iter() {
                let allowed = BLANK_ALLOWED
                    .iter()
                    .any(|(name, allowed)| *name == &*tool.name && allowed == field);
                if !value.is_string() || allowed {
                    continue;
                }
                let mut arguments = full.clone();
                arguments.insert(field.clone(), json!(""));

                let stub = RecordingClient::new();
                let accessor = Arc::new(ClientAccessor::with_client(stub.clone()));
                let handler = registry.handler(&tool.name).unwrap();
                let result = handler(arguments, accessor).await;

                assert_eq!(result.is_error, Some(true), "{} accepted blank `{}`", tool.name, field);
                assert!(stub.calls().is_empty(), "{} reached the client", tool.name);
                let expected = format!("Error: `{}` is required for {} operation", field, tool.name);
                assert_eq!(envelope::text_of(&result), Some(expected.as_str()));
            }
        }
    }

    #[tokio::test]
    async fn test_blank_variable_value_is_sent() {
        let registry = ToolRegistry::new(ToolMode::Operations).unwrap();
        let stub = RecordingClient::new();
        let accessor = Arc::new(ClientAccessor::with_client(stub.clone()));
        let handler = registry.handler("update_variable_value").unwrap();

        let arguments = json!({ "variable_id": "v1", "value": "" });
        let result = handler(arguments.as_object().cloned().unwrap(), accessor).await;
        assert_eq!(result.is_error, Some(false));
        assert_eq!(stub.calls().len(), 1);
    }
}
