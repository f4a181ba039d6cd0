use crate::board::PauseLabels;
use crate::board::milestone::{Milestone, MilestoneExport};
use crate::github::source::{DataSource, DataSourceError};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, info, warn};

/// A milestone could not be given a unique key and was dropped.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("milestone \"{title}\" #{number} collides with key \"{key}\"")]
pub struct MilestoneKeyCollision {
    pub key: String,
    pub title: String,
    pub number: u64,
}

#[derive(Debug, Default)]
pub struct Repository {
    name: String,
    milestones: HashMap<String, Milestone>,
    order: Vec<String>,
    collided_titles: HashSet<String>,
    fetch_error: Option<String>,
}

fn extended_key(milestone: &Milestone) -> String {
    format!("{} #{}", milestone.title(), milestone.number())
}

impl Repository {
    pub fn new(name: &str) -> Self {
        Repository {
            name: name.trim().to_string(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Milestones with their keys, in key order once [`Repository::sort_milestones`] ran.
    pub fn milestones(&self) -> impl Iterator<Item = (&str, &Milestone)> {
        self.order
            .iter()
            .filter_map(|key| self.milestones.get(key).map(|m| (key.as_str(), m)))
    }

    pub fn milestone(&self, key: &str) -> Option<&Milestone> {
        self.milestones.get(key)
    }

    pub fn len(&self) -> usize {
        self.milestones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.milestones.is_empty()
    }

    /// Why fetching stopped early, if it did.
    pub fn fetch_error(&self) -> Option<&str> {
        self.fetch_error.as_deref()
    }

    fn insert(&mut self, key: String, milestone: Milestone) {
        self.order.push(key.clone());
        self.milestones.insert(key, milestone);
    }

    fn remove(&mut self, key: &str) -> Option<Milestone> {
        self.order.retain(|existing| existing != key);
        self.milestones.remove(key)
    }

    fn reject(&self, key: String, milestone: &Milestone) -> MilestoneKeyCollision {
        let collision = MilestoneKeyCollision {
            key,
            title: milestone.title().to_string(),
            number: milestone.number(),
        };
        warn!(repository = %self.name, "{collision}, dropping it");
        collision
    }

    /// Insert a milestone under its title, or under `key` when given.
    ///
    /// Two milestones sharing a title are both re-keyed to `"{title} #{number}"`.
    /// A milestone that still collides is rejected; nothing is overwritten.
    pub fn add_milestone(
        &mut self,
        milestone: Milestone,
        key: Option<&str>,
    ) -> Result<(), MilestoneKeyCollision> {
        if let Some(key) = key {
            if self.milestones.contains_key(key) {
                return Err(self.reject(key.to_string(), &milestone));
            }
            self.insert(key.to_string(), milestone);
            return Ok(());
        }

        let title = milestone.title().to_string();
        let occupant_title = self
            .milestones
            .get(&title)
            .map(|existing| existing.title().to_string());
        if !self.collided_titles.contains(&title) {
            let Some(occupant_title) = occupant_title else {
                self.insert(title, milestone);
                return Ok(());
            };

            // First collision on this title: move the existing entry aside.
            // An entry stored there under an explicit key keeps its place.
            if occupant_title == title {
                if let Some(existing) = self.remove(&title) {
                    let existing_key = extended_key(&existing);
                    if self.milestones.contains_key(&existing_key) {
                        self.insert(title.clone(), existing);
                        return Err(self.reject(title, &milestone));
                    }
                    self.insert(existing_key, existing);
                }
            }
            self.collided_titles.insert(title);
        }

        let key = extended_key(&milestone);
        if self.milestones.contains_key(&key) {
            return Err(self.reject(key, &milestone));
        }
        self.insert(key, milestone);
        Ok(())
    }

    pub fn sort_milestones(&mut self) {
        self.order.sort();
    }

    /// Build the repository's milestones from `source`.
    ///
    /// Milestones without both open and closed issues are skipped. A data-source
    /// failure stops the fetch and keeps what was added so far.
    pub async fn fetch_milestones(&mut self, source: &dyn DataSource, pause_labels: &PauseLabels) {
        if let Err(err) = self.fetch_all(source, pause_labels).await {
            warn!(repository = %self.name, error = %err, "failed to fetch milestones");
            self.fetch_error = Some(err.to_string());
        }
        self.sort_milestones();
        info!(repository = %self.name, milestones = self.len(), "fetched repository");
    }

    async fn fetch_all(
        &mut self,
        source: &dyn DataSource,
        pause_labels: &PauseLabels,
    ) -> Result<(), DataSourceError> {
        let records = source.list_milestones(&self.name).await?;

        for record in records {
            if !record.has_mixed_state() {
                debug!(
                    repository = %self.name,
                    milestone = %record.title,
                    open = record.open_issue_count,
                    closed = record.closed_issue_count,
                    "skipping milestone without both open and closed issues"
                );
                continue;
            }
            let mut milestone = Milestone::from_record(&record);
            milestone
                .fetch_issues(source, &self.name, pause_labels)
                .await?;
            // A rejected milestone has already been logged.
            let _ = self.add_milestone(milestone, None);
        }
        Ok(())
    }

    pub fn export(&self) -> RepositoryExport {
        RepositoryExport {
            name: self.name.clone(),
            milestones: self
                .milestones()
                .map(|(_, milestone)| milestone.export())
                .collect(),
            error: self.fetch_error.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepositoryExport {
    pub name: String,
    pub milestones: Vec<MilestoneExport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
