use crate::github::records::{RawIssue, RawMilestone};
use crate::github::source::{DataSource, DataSourceError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const PER_PAGE: u32 = 100;
const USER_AGENT: &str = "kanban-board";
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// [`DataSource`] backed by the GitHub REST API.
pub struct GithubClient {
    client: reqwest::Client,
    api_url: String,
    token: String,
    account: Option<String>,
}

impl GithubClient {
    /// Create a client authenticating with `token`.
    ///
    /// Bare repository names are resolved against `account`; names given as
    /// `<owner>/<repo>` are used as is.
    pub fn new(
        token: &str,
        account: Option<&str>,
        api_url: &str,
    ) -> Result<Self, DataSourceError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(GithubClient {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            account: account.map(str::to_string),
        })
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        page: u32,
    ) -> Result<Vec<T>, DataSourceError> {
        let response = self
            .client
            .get(format!("{}{}", self.api_url, path))
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT)
            .query(query)
            .query(&[("per_page", PER_PAGE), ("page", page)])
            .send()
            .await?;

        let remaining = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        classify_status(response.status().as_u16(), remaining.as_deref(), path)?;

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn get_all<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, DataSourceError> {
        collect_pages(move |page| self.get_page(path, query, page)).await
    }
}

#[async_trait]
impl DataSource for GithubClient {
    async fn list_milestones(&self, repository: &str) -> Result<Vec<RawMilestone>, DataSourceError> {
        let path = format!(
            "/repos/{}/milestones",
            repository_path(self.account.as_deref(), repository)?
        );
        self.get_all(&path, &[("state", "open".to_string())]).await
    }

    async fn list_issues(
        &self,
        repository: &str,
        milestone: u64,
    ) -> Result<Vec<RawIssue>, DataSourceError> {
        let path = format!(
            "/repos/{}/issues",
            repository_path(self.account.as_deref(), repository)?
        );
        self.get_all(
            &path,
            &[
                ("milestone", milestone.to_string()),
                ("state", "all".to_string()),
            ],
        )
        .await
    }
}

/// Resolve a configured repository name to `<owner>/<repo>`.
pub fn repository_path(account: Option<&str>, repository: &str) -> Result<String, DataSourceError> {
    let repository = repository.trim();
    if repository.contains('/') {
        return Ok(repository.to_string());
    }
    match account.map(str::trim) {
        Some(account) if !account.is_empty() => Ok(format!("{account}/{repository}")),
        _ => Err(DataSourceError::NotFound(format!(
            "{repository} (no account configured)"
        ))),
    }
}

/// Map a non-success HTTP status to the matching [`DataSourceError`].
pub fn classify_status(
    status: u16,
    rate_limit_remaining: Option<&str>,
    path: &str,
) -> Result<(), DataSourceError> {
    match status {
        200..=299 => Ok(()),
        401 => Err(DataSourceError::Unauthorized),
        403 | 429 if rate_limit_remaining == Some("0") => Err(DataSourceError::RateLimited),
        429 => Err(DataSourceError::RateLimited),
        403 => Err(DataSourceError::Forbidden),
        404 => Err(DataSourceError::NotFound(path.to_string())),
        other => Err(DataSourceError::Status(other)),
    }
}

/// Request successive pages, starting at 1, until an empty page comes back.
pub async fn collect_pages<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>, DataSourceError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>, DataSourceError>>,
{
    let mut all = Vec::new();
    let mut page = 1;

    loop {
        let items = fetch_page(page).await?;
        if items.is_empty() {
            break;
        }
        all.extend(items);
        page += 1;
    }

    Ok(all)
}
