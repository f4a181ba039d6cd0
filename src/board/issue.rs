use crate::github::records::RawIssue;
use serde::Serialize;

/// Where an issue sits on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    /// Open and unassigned.
    Queued,
    /// Open and assigned.
    Active,
    /// Closed.
    Completed,
}

impl IssueState {
    pub const ALL: [IssueState; 3] = [IssueState::Queued, IssueState::Active, IssueState::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueState::Queued => "queued",
            IssueState::Active => "active",
            IssueState::Completed => "completed",
        }
    }

    pub fn parse(name: &str) -> Option<IssueState> {
        IssueState::ALL
            .into_iter()
            .find(|state| state.as_str() == name)
    }

    fn derive(closed: bool, assigned: bool) -> IssueState {
        match (closed, assigned) {
            (true, _) => IssueState::Completed,
            (false, true) => IssueState::Active,
            (false, false) => IssueState::Queued,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    title: String,
    url: String,
    number: u64,
    assignee: Option<String>,
    state: IssueState,
    labels: Vec<String>,
    label_names: Vec<String>,
    paused: bool,
}

impl Issue {
    /// Build a typed issue from an API record.
    ///
    /// Pull requests are expected to be filtered out before this point.
    pub fn classify(record: &RawIssue) -> Issue {
        let assignee = record
            .assignee
            .as_ref()
            .map(|assignee| assignee.avatar_url.clone());
        Issue {
            title: record.title.clone(),
            url: record.url.clone(),
            number: record.number,
            state: IssueState::derive(record.is_closed(), assignee.is_some()),
            assignee,
            labels: record
                .labels
                .iter()
                .map(|label| label.name.trim().to_lowercase())
                .collect(),
            label_names: record
                .labels
                .iter()
                .map(|label| label.name.trim().to_string())
                .collect(),
            paused: false,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    /// Avatar URL of the assignee, exactly as the API returned it.
    pub fn assignee(&self) -> Option<&str> {
        self.assignee.as_deref()
    }

    pub fn state(&self) -> IssueState {
        self.state
    }

    /// Label names, trimmed and lowercased.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    /// Flag an active issue as paused when one of its labels is a pause label.
    ///
    /// Case-sensitive matching compares the label names as the tracker spells
    /// them; otherwise both sides are lowercased. Non-active issues are never
    /// paused. Once set, the flag stays set.
    pub fn is_paused(&mut self, pause_labels: &[String], case_sensitive: bool) -> bool {
        if self.state != IssueState::Active {
            return false;
        }
        if !self.paused {
            self.paused = pause_labels.iter().any(|pause| {
                let pause = pause.trim();
                if case_sensitive {
                    self.label_names.iter().any(|name| name == pause)
                } else {
                    let pause = pause.to_lowercase();
                    self.labels.contains(&pause)
                }
            });
        }
        self.paused
    }
}

/// The per-issue export consumed by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueExport {
    pub url: String,
    pub title: String,
    pub assignee: Option<String>,
    pub paused: bool,
}

impl From<&Issue> for IssueExport {
    fn from(issue: &Issue) -> Self {
        IssueExport {
            url: issue.url.clone(),
            title: issue.title.clone(),
            assignee: issue.assignee.clone(),
            paused: issue.paused,
        }
    }
}
