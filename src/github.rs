use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use serde::Deserialize;

use crate::config::RepoConfig;
use crate::error::{IssueFeedError, Result};
use crate::source::{IssueSource, PageQuery};
use crate::types::{Issue, Label};

/// Anonymous GitHub REST client scoped to a single repository.
pub struct GitHub {
    client: Octocrab,
    owner: String,
    repo: String,
}

impl std::fmt::Debug for GitHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHub")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .finish_non_exhaustive()
    }
}

impl From<octocrab::Error> for IssueFeedError {
    fn from(err: octocrab::Error) -> Self {
        IssueFeedError::Api(err.to_string())
    }
}

impl GitHub {
    pub fn new(repo: &RepoConfig) -> Result<Self> {
        let client = Octocrab::builder()
            .base_uri(repo.api_base.as_str())
            .map_err(|e| IssueFeedError::Config(format!("invalid api_base: {}", e)))?
            .build()?;

        Ok(Self {
            client,
            owner: repo.owner.clone(),
            repo: repo.name.clone(),
        })
    }

    fn issues_path(&self) -> String {
        format!("/repos/{}/{}/issues", self.owner, self.repo)
    }
}

// GitHub API response types. Only the fields the feed renders are decoded.

#[derive(Deserialize)]
struct GhIssue {
    id: u64,
    number: u64,
    title: String,
    html_url: String,
    user: GhUser,
    #[serde(default)]
    labels: Vec<GhLabel>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pull_request: Option<serde::de::IgnoredAny>,
}

#[derive(Deserialize)]
struct GhUser {
    login: String,
}

#[derive(Deserialize)]
struct GhLabel {
    id: u64,
    name: String,
    #[serde(default)]
    color: String,
}

impl From<GhIssue> for Issue {
    fn from(issue: GhIssue) -> Self {
        Issue {
            id: issue.id,
            number: issue.number,
            title: issue.title,
            author: issue.user.login,
            labels: issue
                .labels
                .into_iter()
                .map(|l| Label {
                    id: l.id,
                    name: l.name,
                    color: l.color,
                })
                .collect(),
            url: issue.html_url,
            created_at: issue.created_at,
            is_pull_request: issue.pull_request.is_some(),
        }
    }
}

#[async_trait]
impl IssueSource for GitHub {
    fn name(&self) -> &str {
        "GitHub"
    }

    async fn list_issues(&self, query: PageQuery) -> Result<Vec<Issue>> {
        let page = query.page.to_string();
        let per_page = query.per_page.to_string();
        let params = [
            ("page", page.as_str()),
            ("per_page", per_page.as_str()),
            ("state", query.state.as_api_str()),
        ];

        let issues: Vec<GhIssue> = self.client.get(self.issues_path(), Some(&params)).await?;

        Ok(issues.into_iter().map(Issue::from).collect())
    }
}
