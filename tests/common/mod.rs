// Mock source host for workflow tests - records calls, no side effects
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use gitflow_finish::config::{RepoName, WorkflowConfig};
use gitflow_finish::github::{
    CommitAuthor, CreatedTag, GitCommit, GitHubError, PullRequestContext, RepositoryInfo,
    SourceHost, TagSpec,
};
use gitflow_finish::version::BranchGrammar;

pub const TAG_OBJECT_SHA: &str = "tag-object-sha";
pub const MERGE_RESULT_SHA: &str = "merge-sha";

/// Every host operation the workflow performed, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    FetchRepository,
    FetchPullRequest(u64),
    BranchExists(String),
    FetchCommit(String),
    TagReferenceExists(String),
    CreateTag {
        name: String,
        message: String,
        target_sha: String,
        tagger: CommitAuthor,
    },
    CreateTagReference {
        tag: String,
        tag_sha: String,
    },
    MergeBranches {
        base: String,
        head: String,
    },
    DeleteBranchReference(String),
}

impl HostCall {
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            HostCall::CreateTag { .. }
                | HostCall::CreateTagReference { .. }
                | HostCall::MergeBranches { .. }
                | HostCall::DeleteBranchReference(_)
        )
    }
}

/// Shared call log the test keeps a handle on after the workflow takes
/// ownership of the mock.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<HostCall>>>);

impl CallLog {
    pub fn record(&self, call: HostCall) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.0.lock().unwrap().clone()
    }

    pub fn mutating_calls(&self) -> Vec<HostCall> {
        self.calls()
            .into_iter()
            .filter(HostCall::is_mutating)
            .collect()
    }
}

/// Mock host that stores expected responses and records every call.
#[derive(Debug)]
pub struct MockHost {
    pub pull_request: PullRequestContext,
    pub existing_tags: Vec<String>,
    pub missing_branches: Vec<String>,
    pub fail_merge: bool,
    pub log: CallLog,
}

impl MockHost {
    pub fn new(pull_request: PullRequestContext) -> Self {
        Self {
            pull_request,
            existing_tags: Vec::new(),
            missing_branches: Vec::new(),
            fail_merge: false,
            log: CallLog::default(),
        }
    }

    pub fn author() -> CommitAuthor {
        CommitAuthor {
            name: "Release Bot".to_string(),
            email: "bot@acme.test".to_string(),
        }
    }
}

#[async_trait]
impl SourceHost for MockHost {
    async fn fetch_repository(&self) -> Result<RepositoryInfo, GitHubError> {
        self.log.record(HostCall::FetchRepository);
        Ok(RepositoryInfo {
            full_name: "acme/widget".to_string(),
        })
    }

    async fn fetch_pull_request(&self, number: u64) -> Result<PullRequestContext, GitHubError> {
        self.log.record(HostCall::FetchPullRequest(number));
        Ok(self.pull_request.clone())
    }

    async fn branch_exists(&self, branch: &str) -> Result<bool, GitHubError> {
        self.log.record(HostCall::BranchExists(branch.to_string()));
        Ok(!self.missing_branches.iter().any(|b| b == branch))
    }

    async fn fetch_commit(&self, sha: &str) -> Result<GitCommit, GitHubError> {
        self.log.record(HostCall::FetchCommit(sha.to_string()));
        Ok(GitCommit {
            sha: sha.to_string(),
            author: Self::author(),
        })
    }

    async fn tag_reference_exists(&self, tag: &str) -> Result<bool, GitHubError> {
        self.log
            .record(HostCall::TagReferenceExists(tag.to_string()));
        Ok(self.existing_tags.iter().any(|t| t == tag))
    }

    async fn create_tag(&self, spec: &TagSpec) -> Result<CreatedTag, GitHubError> {
        self.log.record(HostCall::CreateTag {
            name: spec.name.clone(),
            message: spec.message.clone(),
            target_sha: spec.target_sha.clone(),
            tagger: spec.tagger.clone(),
        });
        Ok(CreatedTag {
            sha: TAG_OBJECT_SHA.to_string(),
            tag: spec.name.clone(),
        })
    }

    async fn create_tag_reference(&self, tag: &str, tag_sha: &str) -> Result<(), GitHubError> {
        self.log.record(HostCall::CreateTagReference {
            tag: tag.to_string(),
            tag_sha: tag_sha.to_string(),
        });
        Ok(())
    }

    async fn merge_branches(&self, base: &str, head: &str) -> Result<String, GitHubError> {
        self.log.record(HostCall::MergeBranches {
            base: base.to_string(),
            head: head.to_string(),
        });
        if self.fail_merge {
            return Err(GitHubError::UnexpectedStatus {
                operation: "merging branches",
                status: 409,
            });
        }
        Ok(MERGE_RESULT_SHA.to_string())
    }

    async fn delete_branch_reference(&self, branch: &str) -> Result<(), GitHubError> {
        self.log
            .record(HostCall::DeleteBranchReference(branch.to_string()));
        Ok(())
    }
}

pub fn merged_pull_request(number: u64, head_ref: &str, merge_sha: &str) -> PullRequestContext {
    PullRequestContext {
        number,
        head_ref: head_ref.to_string(),
        base_ref: "main".to_string(),
        merged: true,
        merge_commit_sha: Some(merge_sha.to_string()),
    }
}

pub fn release_config(pr_number: u64) -> WorkflowConfig {
    WorkflowConfig {
        repository: "acme/widget".parse::<RepoName>().unwrap(),
        pr_number,
        merge_into_development: true,
        development_branch: "develop".to_string(),
        delete_source_branch: true,
        tag_prefix: "v".to_string(),
        grammar: BranchGrammar::OptionalV,
    }
}
