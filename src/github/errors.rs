use thiserror::Error;

/// Faults surfaced by the GitHub host client.
///
/// No local recovery or retry happens here; whatever the transport reports
/// propagates unchanged to the single top-level handler.
#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub API error: {0}")]
    Api(#[from] octocrab::Error),

    #[error("GitHub API returned status {status} while {operation}")]
    UnexpectedStatus {
        operation: &'static str,
        status: u16,
    },
}
