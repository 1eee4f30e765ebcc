use async_trait::async_trait;
use octocrab::params::repos::Reference;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::errors::GitHubError;
use super::types::{CreatedTag, GitCommit, PullRequestContext, RepositoryInfo, TagSpec};
use crate::config::RepoName;

/// Remote operations the finish workflow needs from the source host.
///
/// The workflow only talks to this trait, so tests can drive it with a
/// recording mock instead of a live host.
#[async_trait]
pub trait SourceHost {
    async fn fetch_repository(&self) -> Result<RepositoryInfo, GitHubError>;
    async fn fetch_pull_request(&self, number: u64) -> Result<PullRequestContext, GitHubError>;
    async fn branch_exists(&self, branch: &str) -> Result<bool, GitHubError>;
    async fn fetch_commit(&self, sha: &str) -> Result<GitCommit, GitHubError>;
    async fn tag_reference_exists(&self, tag: &str) -> Result<bool, GitHubError>;
    async fn create_tag(&self, spec: &TagSpec) -> Result<CreatedTag, GitHubError>;
    async fn create_tag_reference(&self, tag: &str, tag_sha: &str) -> Result<(), GitHubError>;
    async fn merge_branches(&self, base: &str, head: &str) -> Result<String, GitHubError>;
    async fn delete_branch_reference(&self, branch: &str) -> Result<(), GitHubError>;
}

/// GitHub client backed by octocrab.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    octocrab: Octocrab,
    owner: String,
    repo: String,
}

impl GitHubClient {
    pub fn new(token: String, repo_name: RepoName) -> Result<Self, GitHubError> {
        let octocrab = Octocrab::builder().personal_token(token).build()?;
        Ok(GitHubClient {
            octocrab,
            owner: repo_name.owner,
            repo: repo_name.repo,
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }
}

/// Request body for the git tag-object endpoint.
#[derive(Debug, Serialize)]
struct NewTagRequest<'a> {
    tag: &'a str,
    message: &'a str,
    object: &'a str,
    #[serde(rename = "type")]
    target_type: &'static str,
    tagger: TaggerRequest<'a>,
}

#[derive(Debug, Serialize)]
struct TaggerRequest<'a> {
    name: &'a str,
    email: &'a str,
    date: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
struct MergeCommitResponse {
    sha: String,
}

#[async_trait]
impl SourceHost for GitHubClient {
    async fn fetch_repository(&self) -> Result<RepositoryInfo, GitHubError> {
        let repo = self.octocrab.repos(&self.owner, &self.repo).get().await?;
        Ok(RepositoryInfo {
            full_name: repo
                .full_name
                .unwrap_or_else(|| format!("{}/{}", self.owner, self.repo)),
        })
    }

    async fn fetch_pull_request(&self, number: u64) -> Result<PullRequestContext, GitHubError> {
        let pr = self
            .octocrab
            .pulls(&self.owner, &self.repo)
            .get(number)
            .await?;

        Ok(PullRequestContext {
            number: pr.number,
            head_ref: pr.head.ref_field.clone(),
            base_ref: pr.base.ref_field.clone(),
            merged: pr.merged.unwrap_or(false),
            merge_commit_sha: pr.merge_commit_sha,
        })
    }

    async fn branch_exists(&self, branch: &str) -> Result<bool, GitHubError> {
        match self
            .octocrab
            .repos(&self.owner, &self.repo)
            .get_ref(&Reference::Branch(branch.to_string()))
            .await
        {
            Ok(_) => Ok(true),
            Err(octocrab::Error::GitHub { source, .. }) if source.status_code.as_u16() == 404 => {
                Ok(false)
            }
            Err(e) => Err(GitHubError::Api(e)),
        }
    }

    async fn fetch_commit(&self, sha: &str) -> Result<GitCommit, GitHubError> {
        let route = format!("/repos/{}/{}/git/commits/{}", self.owner, self.repo, sha);
        let commit: GitCommit = self.octocrab.get(route, None::<&()>).await?;
        Ok(commit)
    }

    async fn tag_reference_exists(&self, tag: &str) -> Result<bool, GitHubError> {
        match self
            .octocrab
            .repos(&self.owner, &self.repo)
            .get_ref(&Reference::Tag(tag.to_string()))
            .await
        {
            Ok(_) => Ok(true),
            Err(octocrab::Error::GitHub { source, .. }) if source.status_code.as_u16() == 404 => {
                Ok(false)
            }
            Err(e) => Err(GitHubError::Api(e)),
        }
    }

    async fn create_tag(&self, spec: &TagSpec) -> Result<CreatedTag, GitHubError> {
        let route = format!("/repos/{}/{}/git/tags", self.owner, self.repo);
        let body = NewTagRequest {
            tag: &spec.name,
            message: &spec.message,
            object: &spec.target_sha,
            target_type: "commit",
            tagger: TaggerRequest {
                name: &spec.tagger.name,
                email: &spec.tagger.email,
                date: spec.timestamp,
            },
        };
        let created: CreatedTag = self.octocrab.post(route, Some(&body)).await?;
        Ok(created)
    }

    async fn create_tag_reference(&self, tag: &str, tag_sha: &str) -> Result<(), GitHubError> {
        self.octocrab
            .repos(&self.owner, &self.repo)
            .create_ref(&Reference::Tag(tag.to_string()), tag_sha)
            .await?;
        Ok(())
    }

    async fn merge_branches(&self, base: &str, head: &str) -> Result<String, GitHubError> {
        let route = format!("/repos/{}/{}/merges", self.owner, self.repo);
        let body = json!({ "base": base, "head": head });
        let merged: MergeCommitResponse = self.octocrab.post(route, Some(&body)).await?;
        Ok(merged.sha)
    }

    async fn delete_branch_reference(&self, branch: &str) -> Result<(), GitHubError> {
        let route = format!("/repos/{}/{}/git/refs/heads/{}", self.owner, self.repo, branch);
        let response = self.octocrab._delete(route, None::<&()>).await?;
        if !response.status().is_success() {
            return Err(GitHubError::UnexpectedStatus {
                operation: "deleting branch reference",
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }
}
