use crate::github::records::{RawIssue, RawMilestone};
use crate::github::source::{DataSource, DataSourceError};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Mutex;

/// Records for one repository held by a [`MemorySource`].
#[derive(Debug, Default, Deserialize)]
pub struct MemoryRepository {
    #[serde(default)]
    pub milestones: Vec<RawMilestone>,
    /// Issue records keyed by milestone number.
    #[serde(default)]
    pub issues: HashMap<u64, Vec<RawIssue>>,
    /// When set, listing milestones for this repository fails with this message.
    #[serde(default)]
    pub fail: Option<String>,
    /// Milestones whose issue listing fails.
    #[serde(default)]
    pub failing_milestones: Vec<u64>,
}

/// Data source backed by records held in memory.
///
/// Loaded from a JSON fixture with [`MemorySource::from_json`] to render a board
/// offline:
///
/// ```json
/// {"repositories": {"acme/widgets": {"milestones": [...], "issues": {"1": [...]}}}}
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct MemorySource {
    #[serde(default)]
    repositories: HashMap<String, MemoryRepository>,
    #[serde(skip)]
    issue_requests: Mutex<Vec<(String, u64)>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(content: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(content)
    }

    fn repository_mut(&mut self, repository: &str) -> &mut MemoryRepository {
        self.repositories.entry(repository.to_string()).or_default()
    }

    pub fn with_milestone(mut self, repository: &str, milestone: RawMilestone) -> Self {
        self.repository_mut(repository).milestones.push(milestone);
        self
    }

    pub fn with_issue(mut self, repository: &str, milestone: u64, issue: RawIssue) -> Self {
        self.repository_mut(repository)
            .issues
            .entry(milestone)
            .or_default()
            .push(issue);
        self
    }

    pub fn with_failure(mut self, repository: &str, message: &str) -> Self {
        self.repository_mut(repository).fail = Some(message.to_string());
        self
    }

    pub fn with_failing_milestone(mut self, repository: &str, milestone: u64) -> Self {
        self.repository_mut(repository)
            .failing_milestones
            .push(milestone);
        self
    }

    /// Every `(repository, milestone)` pair whose issues were requested, in request order.
    pub fn issue_requests(&self) -> Vec<(String, u64)> {
        match self.issue_requests.lock() {
            Ok(requests) => requests.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn lookup(&self, repository: &str) -> Result<&MemoryRepository, DataSourceError> {
        self.repositories
            .get(repository)
            .ok_or_else(|| DataSourceError::NotFound(repository.to_string()))
    }
}

#[async_trait]
impl DataSource for MemorySource {
    async fn list_milestones(&self, repository: &str) -> Result<Vec<RawMilestone>, DataSourceError> {
        let records = self.lookup(repository)?;
        if let Some(message) = &records.fail {
            return Err(DataSourceError::Fixture(message.clone()));
        }
        Ok(records.milestones.clone())
    }

    async fn list_issues(
        &self,
        repository: &str,
        milestone: u64,
    ) -> Result<Vec<RawIssue>, DataSourceError> {
        match self.issue_requests.lock() {
            Ok(mut requests) => requests.push((repository.to_string(), milestone)),
            Err(poisoned) => poisoned
                .into_inner()
                .push((repository.to_string(), milestone)),
        }

        let records = self.lookup(repository)?;
        if records.failing_milestones.contains(&milestone) {
            return Err(DataSourceError::Fixture(format!(
                "issues of milestone {milestone} unavailable"
            )));
        }
        Ok(records.issues.get(&milestone).cloned().unwrap_or_default())
    }
}
