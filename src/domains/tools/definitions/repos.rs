//! Git repository tools.
//!
//! `create_repo` registers a repository on a server; `clone_repo` and
//! `pull_repo` act on one that already exists.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::common::{
    Hints, NoParams, OperationTool, Output, RemoteCall, require, require_all, to_params,
};
use crate::domains::tools::error::ToolError;

/// Git provider used when none is given.
pub const DEFAULT_GIT_PROVIDER: &str = "github.com";

/// Branch used when none is given.
pub const DEFAULT_BRANCH: &str = "main";

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters targeting one repository.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct RepoIdParams {
    /// Repository ID or name.
    pub repo_id: String,
}

/// Parameters for registering a repository.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
pub struct CreateRepoParams {
    /// Repository name in Komodo.
    pub name: String,

    /// Server the repository is cloned onto.
    pub server_id: String,

    /// Git provider domain (default: "github.com").
    pub git_provider: Option<String>,

    /// Git account used for private repositories.
    pub git_account: Option<String>,

    /// Repository path on the provider (e.g. "owner/project").
    pub repo: Option<String>,

    /// Branch to check out (default: "main").
    pub branch: Option<String>,

    /// Repository description.
    pub description: Option<String>,

    /// Tags for the repository.
    pub tags: Option<Vec<String>>,
}

/// Operations offered by the repository hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RepoOperation {
    List,
    Get,
    Create,
    Clone,
    Pull,
    Delete,
}

impl RepoOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Get => "get",
            Self::Create => "create",
            Self::Clone => "clone",
            Self::Pull => "pull",
            Self::Delete => "delete",
        }
    }
}

/// Parameters for the repository hub.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RepoOpsParams {
    /// Operation to perform.
    pub operation: RepoOperation,

    /// Repository ID (required for get, clone, pull, delete).
    pub repo_id: Option<String>,

    /// Repository name (required for create).
    pub name: Option<String>,

    /// Server ID (required for create).
    pub server_id: Option<String>,

    /// Git provider domain.
    pub git_provider: Option<String>,

    /// Git account name.
    pub git_account: Option<String>,

    /// Repository path on the provider.
    pub repo: Option<String>,

    /// Branch to check out.
    pub branch: Option<String>,

    /// Repository description.
    pub description: Option<String>,

    /// Tags for the repository.
    pub tags: Option<Vec<String>>,
}

impl RepoOpsParams {
    pub fn into_op(self) -> Result<RepoOp, ToolError> {
        let op = self.operation.as_str();
        let target = |id: Option<String>| -> Result<RepoIdParams, ToolError> {
            Ok(RepoIdParams {
                repo_id: require(op, "repo_id", id)?,
            })
        };

        Ok(match self.operation {
            RepoOperation::List => RepoOp::List,
            RepoOperation::Get => RepoOp::Get(target(self.repo_id)?),
            RepoOperation::Create => {
                let [name, server_id] =
                    require_all(op, [("name", self.name), ("server_id", self.server_id)])?;
                RepoOp::Create(CreateRepoParams {
                    name,
                    server_id,
                    git_provider: self.git_provider,
                    git_account: self.git_account,
                    repo: self.repo,
                    branch: self.branch,
                    description: self.description,
                    tags: self.tags,
                })
            }
            RepoOperation::Clone => RepoOp::Clone(target(self.repo_id)?),
            RepoOperation::Pull => RepoOp::Pull(target(self.repo_id)?),
            RepoOperation::Delete => RepoOp::Delete(target(self.repo_id)?),
        })
    }
}

// ============================================================================
// Remote Payloads
// ============================================================================

#[derive(Debug, Serialize)]
struct RepoConfigBody {
    server_id: String,
    git_provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    git_account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    repo: Option<String>,
    branch: String,
}

#[derive(Debug, Serialize)]
struct CreateRepoBody {
    name: String,
    config: RepoConfigBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<Vec<String>>,
}

// ============================================================================
// Canonical Operation
// ============================================================================

/// One repository operation, validated and ready to send.
#[derive(Debug, Clone, PartialEq)]
pub enum RepoOp {
    List,
    Get(RepoIdParams),
    Create(CreateRepoParams),
    Clone(RepoIdParams),
    Pull(RepoIdParams),
    Delete(RepoIdParams),
}

impl RepoOp {
    pub fn into_call(self) -> Result<RemoteCall, ToolError> {
        Ok(match self {
            Self::List => RemoteCall::read("ListRepos", json!({})).reply("repos"),
            Self::Get(p) => RemoteCall::read("GetRepo", json!({ "repo": p.repo_id })).reply("repo"),
            Self::Create(p) => {
                let message = format!("Repo '{}' created successfully", p.name);
                let body = CreateRepoBody {
                    name: p.name,
                    config: RepoConfigBody {
                        server_id: p.server_id,
                        git_provider: p
                            .git_provider
                            .unwrap_or_else(|| DEFAULT_GIT_PROVIDER.to_string()),
                        git_account: p.git_account,
                        repo: p.repo,
                        branch: p.branch.unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
                    },
                    description: p.description,
                    tags: p.tags,
                };
                RemoteCall::write("CreateRepo", to_params(&body)?)
                    .reply("repo")
                    .confirm(message)
            }
            Self::Clone(p) => RemoteCall::execute("CloneRepo", json!({ "repo": p.repo_id })),
            Self::Pull(p) => RemoteCall::execute("PullRepo", json!({ "repo": p.repo_id })),
            Self::Delete(p) => {
                let message = format!("Repo '{}' deleted successfully", p.repo_id);
                RemoteCall::write("DeleteRepo", json!({ "id": p.repo_id })).confirm(message)
            }
        })
    }
}

// ============================================================================
// Tool Definitions
// ============================================================================

pub struct ListReposTool;

impl OperationTool for ListReposTool {
    const NAME: &'static str = "list_repos";
    const TITLE: &'static str = "List Repos";
    const DESCRIPTION: &'static str = "List all Git repositories registered in Komodo.";
    const HINTS: Hints = Hints::READ;
    const OUTPUT: Option<Output> = Some(Output::list("repos"));
    type Params = NoParams;

    fn plan(_: NoParams) -> Result<RemoteCall, ToolError> {
        RepoOp::List.into_call()
    }
}

pub struct GetRepoTool;

impl OperationTool for GetRepoTool {
    const NAME: &'static str = "get_repo";
    const TITLE: &'static str = "Get Repo";
    const DESCRIPTION: &'static str = "Get detailed information about a specific repository.";
    const HINTS: Hints = Hints::READ;
    const OUTPUT: Option<Output> = Some(Output::item("repo"));
    type Params = RepoIdParams;

    fn plan(params: RepoIdParams) -> Result<RemoteCall, ToolError> {
        RepoOp::Get(params).into_call()
    }
}

pub struct CreateRepoTool;

impl OperationTool for CreateRepoTool {
    const NAME: &'static str = "create_repo";
    const TITLE: &'static str = "Create Repo";
    const DESCRIPTION: &'static str = "Register a Git repository on a server. Use clone_repo afterwards to check it out.";
    const HINTS: Hints = Hints::MUTATING;
    const OUTPUT: Option<Output> = Some(Output::confirmed("repo"));
    type Params = CreateRepoParams;

    fn plan(params: CreateRepoParams) -> Result<RemoteCall, ToolError> {
        RepoOp::Create(params).into_call()
    }
}

pub struct CloneRepoTool;

impl OperationTool for CloneRepoTool {
    const NAME: &'static str = "clone_repo";
    const TITLE: &'static str = "Clone Repo";
    const DESCRIPTION: &'static str = "Clone a registered repository onto its server.";
    const HINTS: Hints = Hints::MUTATING;
    const OUTPUT: Option<Output> = Some(Output::UPDATE);
    type Params = RepoIdParams;

    fn plan(params: RepoIdParams) -> Result<RemoteCall, ToolError> {
        RepoOp::Clone(params).into_call()
    }
}

pub struct PullRepoTool;

impl OperationTool for PullRepoTool {
    const NAME: &'static str = "pull_repo";
    const TITLE: &'static str = "Pull Repo";
    const DESCRIPTION: &'static str = "Pull the latest changes of a cloned repository.";
    const HINTS: Hints = Hints::MUTATING;
    const OUTPUT: Option<Output> = Some(Output::UPDATE);
    type Params = RepoIdParams;

    fn plan(params: RepoIdParams) -> Result<RemoteCall, ToolError> {
        RepoOp::Pull(params).into_call()
    }
}

pub struct DeleteRepoTool;

impl OperationTool for DeleteRepoTool {
    const NAME: &'static str = "delete_repo";
    const TITLE: &'static str = "Delete Repo";
    const DESCRIPTION: &'static str = "Delete a repository from Komodo.";
    const HINTS: Hints = Hints::DESTRUCTIVE;
    const OUTPUT: Option<Output> = Some(Output::DELETED);
    type Params = RepoIdParams;

    fn plan(params: RepoIdParams) -> Result<RemoteCall, ToolError> {
        RepoOp::Delete(params).into_call()
    }
}

/// Repository hub.
pub struct RepoOpsTool;

impl OperationTool for RepoOpsTool {
    const NAME: &'static str = "komodo_repo_ops";
    const TITLE: &'static str = "Komodo Repo Operations";
    const DESCRIPTION: &'static str = "Git repository hub. Operations: list, get, create (name and server_id required), clone, pull, delete.";
    const HINTS: Hints = Hints::DESTRUCTIVE;
    type Params = RepoOpsParams;

    fn plan(params: RepoOpsParams) -> Result<RemoteCall, ToolError> {
        params.into_op()?.into_call()
    }
}
