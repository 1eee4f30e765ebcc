use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::version::BranchGrammar;

/// Shape accepted for `--repo-name`.
static REPO_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.-]+/[\w.-]+$").expect("repository name pattern is valid"));

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid repository name passed; repository name should be of format \"owner/repo-name\"")]
    InvalidRepositoryName(String),
}

/// Repository coordinates in `owner/repo` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoName {
    pub owner: String,
    pub repo: String,
}

impl FromStr for RepoName {
    type Err = ConfigError;

    fn from_str(full_name: &str) -> Result<Self, Self::Err> {
        if !REPO_NAME_PATTERN.is_match(full_name) {
            return Err(ConfigError::InvalidRepositoryName(full_name.to_string()));
        }
        let (owner, repo) = full_name
            .split_once('/')
            .ok_or_else(|| ConfigError::InvalidRepositoryName(full_name.to_string()))?;
        Ok(RepoName {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }
}

impl fmt::Display for RepoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Behavioral configuration for one finish run.
///
/// Both CLI modes (release and feature) collapse into this one struct; the
/// mode only decides the deletion-flag spelling, the tag prefix default and
/// the branch grammar. The auth token is consumed by client construction
/// and never stored here.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    pub repository: RepoName,
    pub pr_number: u64,
    pub merge_into_development: bool,
    pub development_branch: String,
    pub delete_source_branch: bool,
    pub tag_prefix: String,
    pub grammar: BranchGrammar,
}
