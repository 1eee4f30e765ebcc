// gitflow-finish - finish merged gitflow pull requests from a CI action
// This exposes the core components for testing and integration

pub mod config;
pub mod github;
pub mod logging;
pub mod version;
pub mod workflow;

// Re-export key types for easy access
pub use config::{ConfigError, RepoName, WorkflowConfig};
pub use github::{
    CommitAuthor, CreatedTag, GitCommit, GitHubClient, GitHubError, PullRequestContext,
    RepositoryInfo, SourceHost, TagSpec,
};
pub use logging::{GroupState, LogHandle, WorkflowCommandFormatter, WorkflowCommandLayer};
pub use version::{BranchGrammar, SemanticVersion};
pub use workflow::{FinishWorkflow, WorkflowError, WorkflowOutcome};
