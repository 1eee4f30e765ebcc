use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::config::WorkflowConfig;
use crate::github::{GitHubError, PullRequestContext, SourceHost, TagSpec};
use crate::version::SemanticVersion;

/// Group label bracketing repository and pull request resolution.
const SETUP_GROUP: &str = "Initial Setup";
/// Group label bracketing the mutating gitflow actions.
const ACTIONS_GROUP: &str = "Applying Gitflow actions";

/// Terminal state of one finish run. Skips are clean outcomes, not errors;
/// they still exit 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowOutcome {
    Completed,
    SkippedNotMerged,
    SkippedNameMismatch,
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Host(#[from] GitHubError),

    #[error("pull request #{0} is merged but has no merge commit sha")]
    MissingMergeCommit(u64),

    #[error("head branch {0} no longer exists on the remote")]
    HeadBranchMissing(String),

    #[error("tag {0} already exists; refusing to finish the same pull request twice")]
    TagAlreadyExists(String),
}

/// Drives the finish pipeline: resolve repository and pull request, check
/// the skip conditions, then tag the merge commit and run the optional
/// trailing actions.
///
/// Host calls are awaited strictly in sequence; a later stage only runs
/// once the previous one has committed. Nothing is rolled back: once the
/// tag reference exists it stays, even if a trailing action fails.
#[derive(Debug)]
pub struct FinishWorkflow<H> {
    host: H,
    config: WorkflowConfig,
}

impl<H: SourceHost> FinishWorkflow<H> {
    pub fn new(host: H, config: WorkflowConfig) -> Self {
        Self { host, config }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub async fn run(&self) -> Result<WorkflowOutcome, WorkflowError> {
        let pr = self
            .resolve_pull_request()
            .instrument(info_span!("setup", log_group = SETUP_GROUP))
            .await?;

        if !pr.merged {
            warn!(
                "Pull request {} has not been merged. No actions will be taken.",
                pr.number
            );
            return Ok(WorkflowOutcome::SkippedNotMerged);
        }

        let Some(version) = SemanticVersion::from_branch(&pr.head_ref, self.config.grammar) else {
            warn!(
                "Head branch {} does not match the required gitflow and semver syntax. No actions will be taken.",
                pr.head_ref
            );
            return Ok(WorkflowOutcome::SkippedNameMismatch);
        };

        self.apply_actions(&pr, &version)
            .instrument(info_span!("actions", log_group = ACTIONS_GROUP))
            .await?;

        Ok(WorkflowOutcome::Completed)
    }

    /// Setup stage: fetch the repository and snapshot the pull request.
    async fn resolve_pull_request(&self) -> Result<PullRequestContext, WorkflowError> {
        info!(
            "Fetching repository information for {}",
            self.config.repository
        );
        let repo = self.host.fetch_repository().await?;
        debug!("Resolved repository {}", repo.full_name);

        info!("Fetching pull request #{}", self.config.pr_number);
        let pr = self.host.fetch_pull_request(self.config.pr_number).await?;
        debug!(
            "Pull request #{} merges {} into {}",
            pr.number, pr.head_ref, pr.base_ref
        );
        Ok(pr)
    }

    /// Mutating stage: create the annotated tag and its reference, then the
    /// independently gated merge-back and branch-deletion actions.
    async fn apply_actions(
        &self,
        pr: &PullRequestContext,
        version: &SemanticVersion,
    ) -> Result<(), WorkflowError> {
        let tag_name = format!("{}{}", self.config.tag_prefix, version.full);
        info!(
            "Valid gitflow and semver branch name found; tag will be created with {}",
            version.full
        );

        info!("Getting branch information for {}", pr.head_ref);
        if !self.host.branch_exists(&pr.head_ref).await? {
            return Err(WorkflowError::HeadBranchMissing(pr.head_ref.clone()));
        }

        if self.host.tag_reference_exists(&tag_name).await? {
            return Err(WorkflowError::TagAlreadyExists(tag_name));
        }

        let merge_sha = pr
            .merge_commit_sha
            .clone()
            .ok_or(WorkflowError::MissingMergeCommit(pr.number))?;
        let merge_commit = self.host.fetch_commit(&merge_sha).await?;

        let spec = TagSpec {
            name: tag_name,
            message: format!("Release version {}", version.full),
            target_sha: merge_sha.clone(),
            tagger: merge_commit.author,
            timestamp: Utc::now(),
        };

        info!(
            "Creating new tag {} on branch {} at commit {}",
            spec.name, pr.base_ref, merge_sha
        );
        let tag = self.host.create_tag(&spec).await?;
        // The reference targets the annotated tag object, not the commit.
        self.host.create_tag_reference(&tag.tag, &tag.sha).await?;
        info!("Tag successfully created");

        if self.config.merge_into_development {
            info!(
                "Merging {} into {}",
                pr.head_ref, self.config.development_branch
            );
            let merge_commit_sha = self
                .host
                .merge_branches(&self.config.development_branch, &pr.head_ref)
                .await?;
            info!(
                "Successfully merged {} into {} with commit {}",
                pr.head_ref, self.config.development_branch, merge_commit_sha
            );
        }

        if self.config.delete_source_branch {
            info!("Deleting branch {}", pr.head_ref);
            self.host.delete_branch_reference(&pr.head_ref).await?;
            info!("Successfully deleted {}", pr.head_ref);
        }

        Ok(())
    }
}
