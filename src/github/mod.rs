pub mod client;
pub mod errors;
pub mod types;

pub use client::{GitHubClient, SourceHost};
pub use errors::GitHubError;
pub use types::{CommitAuthor, CreatedTag, GitCommit, PullRequestContext, RepositoryInfo, TagSpec};
