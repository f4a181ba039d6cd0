use serde::{Deserialize, Serialize};

/// A milestone as listed by the `/milestones` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMilestone {
    pub number: u64,
    pub title: String,
    #[serde(rename = "html_url")]
    pub url: String,
    #[serde(rename = "open_issues", default)]
    pub open_issue_count: u64,
    #[serde(rename = "closed_issues", default)]
    pub closed_issue_count: u64,
}

impl RawMilestone {
    /// A milestone only makes it onto the board when it has both open and closed issues.
    pub fn has_mixed_state(&self) -> bool {
        self.open_issue_count > 0 && self.closed_issue_count > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawIssueState {
    Open,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAssignee {
    pub avatar_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLabel {
    pub name: String,
}

/// An issue as listed by the `/issues` endpoint. Pull requests come through
/// the same endpoint and carry a `pull_request` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawIssue {
    pub number: u64,
    pub title: String,
    #[serde(rename = "html_url")]
    pub url: String,
    pub state: RawIssueState,
    #[serde(default)]
    pub assignee: Option<RawAssignee>,
    #[serde(default)]
    pub labels: Vec<RawLabel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<serde_json::Value>,
}

impl RawIssue {
    pub fn is_closed(&self) -> bool {
        self.state == RawIssueState::Closed
    }

    pub fn is_pull_request(&self) -> bool {
        self.pull_request
            .as_ref()
            .is_some_and(|marker| !marker.is_null())
    }
}
