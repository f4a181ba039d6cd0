//! Aggregation of tracker records into a board: repositories, their milestones,
//! and each milestone's queued, active and completed issues.

pub mod issue;
pub mod milestone;
pub mod repository;

use crate::github::source::DataSource;

pub use issue::{Issue, IssueExport, IssueState};
pub use milestone::{IssuesExport, Milestone, MilestoneExport};
pub use repository::{MilestoneKeyCollision, Repository, RepositoryExport};

/// Labels that mark an active issue as paused.
#[derive(Debug, Clone, PartialEq)]
pub struct PauseLabels {
    pub labels: Vec<String>,
    pub case_sensitive: bool,
}

impl PauseLabels {
    pub fn new(labels: Vec<String>, case_sensitive: bool) -> Self {
        PauseLabels {
            labels: labels
                .into_iter()
                .map(|label| label.trim().to_string())
                .filter(|label| !label.is_empty())
                .collect(),
            case_sensitive,
        }
    }
}

impl Default for PauseLabels {
    fn default() -> Self {
        PauseLabels {
            labels: Vec::new(),
            case_sensitive: true,
        }
    }
}

/// Build the board for `repository_names`, keeping their order.
///
/// A repository whose data cannot be fetched is still present, with whatever
/// milestones were loaded before the failure.
pub async fn build<S: AsRef<str>>(
    repository_names: &[S],
    source: &dyn DataSource,
    pause_labels: &PauseLabels,
) -> Vec<RepositoryExport> {
    let mut board = Vec::with_capacity(repository_names.len());
    for name in repository_names {
        let mut repository = Repository::new(name.as_ref());
        repository.fetch_milestones(source, pause_labels).await;
        board.push(repository.export());
    }
    board
}
