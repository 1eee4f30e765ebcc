use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimal repository facts the workflow cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryInfo {
    pub full_name: String,
}

/// Immutable snapshot of the pull request being finished. Fetched once per
/// run and never re-fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestContext {
    pub number: u64,
    pub head_ref: String,
    pub base_ref: String,
    pub merged: bool,
    pub merge_commit_sha: Option<String>,
}

/// Author identity copied from the merge commit onto the annotated tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitAuthor {
    pub name: String,
    pub email: String,
}

/// Git-data view of a commit, enough to read the author off the merge
/// commit.
#[derive(Debug, Clone, Deserialize)]
pub struct GitCommit {
    pub sha: String,
    pub author: CommitAuthor,
}

/// Input to annotated tag creation.
///
/// The timestamp is the moment of tag creation, not the commit time; the
/// tagger identity comes from the merge commit author.
#[derive(Debug, Clone)]
pub struct TagSpec {
    pub name: String,
    pub message: String,
    pub target_sha: String,
    pub tagger: CommitAuthor,
    pub timestamp: DateTime<Utc>,
}

/// Annotated tag object as returned by the git data API. Its `sha` names
/// the tag object itself, not the commit it points at; the reference must
/// target the tag object so the annotation survives.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedTag {
    pub sha: String,
    pub tag: String,
}
