//! Tool definitions module.
//!
//! One canonical module per Komodo domain. Each exports its per-operation
//! tools and its hub tool; the registry decides which presentation is
//! advertised.

pub mod alerters;
pub mod builds;
pub mod common;
pub mod containers;
pub mod deployments;
pub mod procedures;
pub mod repos;
pub mod servers;
pub mod stacks;
pub mod system;
pub mod variables;

#[cfg(test)]
pub(crate) mod testing;

pub use common::{Hints, OperationTool, Output, RemoteCall, Reply, execute_tool};

pub use alerters::{
    AlerterOpsTool, CreateAlerterTool, DeleteAlerterTool, GetAlerterInfoTool, ListAlertersTool,
    UpdateAlerterTool,
};
pub use builds::{BuildOpsTool, CancelBuildTool, DeleteBuildTool, GetBuildTool, ListBuildsTool, RunBuildTool};
pub use containers::{
    ContainerOpsTool, InspectDockerContainerTool, ListDockerContainersTool, RestartContainerTool,
    StartContainerTool, StopContainerTool,
};
pub use deployments::{
    CreateDeploymentTool, DeleteDeploymentTool, DeployTool, DeploymentOpsTool, GetDeploymentTool,
    ListDeploymentsTool, RestartDeploymentTool, StartDeploymentTool, StopDeploymentTool,
    UpdateDeploymentTool,
};
pub use procedures::{
    CreateProcedureTool, DeleteProcedureTool, GetProcedureInfoTool, ListProceduresTool,
    ProcedureOpsTool, RunProcedureTool, UpdateProcedureTool,
};
pub use repos::{
    CloneRepoTool, CreateRepoTool, DeleteRepoTool, GetRepoTool, ListReposTool, PullRepoTool,
    RepoOpsTool,
};
pub use servers::{
    CreateServerTool, DeleteServerTool, GetServerInfoTool, ListServersTool, RenameServerTool,
    ServerOpsTool, UpdateServerTool,
};
pub use stacks::{
    DeleteStackTool, DeployStackTool, DestroyStackTool, GetStackTool, ListStacksTool,
    RestartStackTool, StackOpsTool, StartStackTool, StopStackTool,
};
pub use system::{GetSystemInfoTool, GetVersionTool, ListSecretsTool, ListUpdatesTool, SystemOpsTool};
pub use variables::{
    CreateVariableTool, DeleteVariableTool, GetVariableTool, ListVariablesTool,
    UpdateVariableValueTool, VariableOpsTool,
};
