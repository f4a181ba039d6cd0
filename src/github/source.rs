use crate::github::records::{RawIssue, RawMilestone};
use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by a [`DataSource`]. Recovered per repository by the board builder.
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("token invalid or expired")]
    Unauthorized,

    #[error("access forbidden")]
    Forbidden,

    #[error("API rate limit exceeded")]
    RateLimited,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("API request error: HTTP {0}")]
    Status(u16),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Fixture(String),
}

/// Read-only access to the tracker's milestones and issues.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// List the milestones of a repository.
    async fn list_milestones(&self, repository: &str) -> Result<Vec<RawMilestone>, DataSourceError>;

    /// List every issue record (pull requests included) attached to a milestone.
    async fn list_issues(
        &self,
        repository: &str,
        milestone: u64,
    ) -> Result<Vec<RawIssue>, DataSourceError>;
}
