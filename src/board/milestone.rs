use crate::board::PauseLabels;
use crate::board::issue::{Issue, IssueExport, IssueState};
use crate::github::records::RawMilestone;
use crate::github::source::{DataSource, DataSourceError};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct Milestone {
    number: u64,
    title: String,
    url: String,
    progress: f64,
    queued: Vec<Issue>,
    active: Vec<Issue>,
    completed: Vec<Issue>,
}

impl Milestone {
    pub fn new(number: u64, title: &str, url: &str) -> Self {
        Milestone {
            number,
            title: title.to_string(),
            url: url.to_string(),
            progress: 0.0,
            queued: Vec::new(),
            active: Vec::new(),
            completed: Vec::new(),
        }
    }

    pub fn from_record(record: &RawMilestone) -> Self {
        Milestone::new(record.number, &record.title, &record.url)
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Percentage of completed issues, valid after [`Milestone::calculate_progress`].
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn add_issue(&mut self, issue: Issue) {
        match issue.state() {
            IssueState::Queued => self.queued.push(issue),
            IssueState::Active => self.active.push(issue),
            IssueState::Completed => self.completed.push(issue),
        }
    }

    /// The bucket holding issues in `state`.
    pub fn issues(&self, state: IssueState) -> &[Issue] {
        match state {
            IssueState::Queued => &self.queued,
            IssueState::Active => &self.active,
            IssueState::Completed => &self.completed,
        }
    }

    /// The bucket named `state`, or nothing for an unknown name.
    pub fn issues_named(&self, state: &str) -> &[Issue] {
        IssueState::parse(state)
            .map(|state| self.issues(state))
            .unwrap_or_default()
    }

    /// All three buckets, in board order.
    pub fn all_issues(&self) -> [(IssueState, &[Issue]); 3] {
        IssueState::ALL.map(|state| (state, self.issues(state)))
    }

    pub fn issue_count(&self) -> usize {
        self.queued.len() + self.active.len() + self.completed.len()
    }

    /// Unpaused issues first, then by issue number.
    pub fn sort_active_issues(&mut self) {
        self.active
            .sort_by_key(|issue| (issue.paused(), issue.number()));
    }

    pub fn calculate_progress(&mut self) {
        let total = self.issue_count();
        self.progress = if total == 0 {
            0.0
        } else {
            (100.0 * self.completed.len() as f64 / total as f64).round()
        };
    }

    /// Load the milestone's issues from `source`, then sort and compute progress once.
    pub async fn fetch_issues(
        &mut self,
        source: &dyn DataSource,
        repository: &str,
        pause_labels: &PauseLabels,
    ) -> Result<(), DataSourceError> {
        let records = source.list_issues(repository, self.number).await?;

        for record in records {
            if record.is_pull_request() {
                debug!(repository, milestone = %self.title, number = record.number, "skipping pull request");
                continue;
            }
            let mut issue = Issue::classify(&record);
            if issue.state() == IssueState::Active {
                issue.is_paused(&pause_labels.labels, pause_labels.case_sensitive);
            }
            self.add_issue(issue);
        }

        self.sort_active_issues();
        self.calculate_progress();
        Ok(())
    }

    pub fn export(&self) -> MilestoneExport {
        let bucket = |issues: &[Issue]| issues.iter().map(IssueExport::from).collect();
        MilestoneExport {
            title: self.title.clone(),
            url: self.url.clone(),
            number: self.number,
            progress: self.progress,
            issues: IssuesExport {
                queued: bucket(&self.queued),
                active: bucket(&self.active),
                completed: bucket(&self.completed),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssuesExport {
    pub queued: Vec<IssueExport>,
    pub active: Vec<IssueExport>,
    pub completed: Vec<IssueExport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MilestoneExport {
    pub title: String,
    pub url: String,
    pub number: u64,
    pub progress: f64,
    pub issues: IssuesExport,
}
