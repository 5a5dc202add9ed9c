// Normalized dashboard dataset.
// Flattened projects, cross-referenced issues, and the merged activity timeline.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::github::{Owner, RateLimitState, Repository};

/// Project board flattened from the GraphQL pages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    pub id: String,
    pub number: u64,
    pub name: String,
    pub description: Option<String>,
    pub url: String,
    pub issues: Vec<ProjectIssue>,
}

impl Project {
    /// First entry for `(number, repository)`, if the board tracks it.
    pub fn find_issue(&self, number: u64, repository: &str) -> Option<&ProjectIssue> {
        self.issues
            .iter()
            .find(|entry| entry.number == number && entry.repository == repository)
    }
}

/// Issue-status link carried by a project board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectIssue {
    pub number: u64,
    pub repository: String,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub assignee: Option<String>,
}

/// Reference back to the board that supplied an issue's status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectRef {
    pub id: String,
    pub number: u64,
    pub name: String,
}

/// Issue with its project status resolved.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardIssue {
    pub repository: String,
    pub number: u64,
    pub title: String,
    /// Raw open/closed state from the REST API.
    pub state: String,
    /// Board status when tracked, otherwise the raw state.
    pub status: String,
    pub project: Option<ProjectRef>,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub assignee: Option<String>,
    pub author: Option<String>,
    pub body: Option<String>,
    pub comments: u64,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

/// Pull request tagged with its repository.
#[derive(Debug, Clone, Serialize)]
pub struct PullRecord {
    pub repository: String,
    pub number: u64,
    pub title: String,
    pub state: String,
    pub draft: bool,
    pub author: Option<String>,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
}

pub const PLACEHOLDER_MESSAGE: &str = "Repository is empty or inaccessible";

/// Commit tagged with its repository. A placeholder marks a repository whose
/// commits could not be listed.
#[derive(Debug, Clone, Serialize)]
pub struct CommitRecord {
    pub repository: String,
    pub sha: String,
    pub message: String,
    pub author: String,
    pub date: Option<DateTime<Utc>>,
    pub url: Option<String>,
    pub placeholder: bool,
}

impl CommitRecord {
    pub fn placeholder(repository: &str) -> Self {
        Self {
            repository: repository.to_string(),
            sha: String::new(),
            message: PLACEHOLDER_MESSAGE.to_string(),
            author: String::new(),
            date: None,
            url: None,
            placeholder: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Commit,
    IssueComment,
    PrComment,
}

impl EventKind {
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Commit => "commit",
            EventKind::IssueComment => "issue comment",
            EventKind::PrComment => "PR comment",
        }
    }
}

/// One row of the unified activity feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEvent {
    pub kind: EventKind,
    pub repository: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    pub summary: String,
    pub url: String,
    /// Issue or pull request number for comment events.
    pub number: Option<u64>,
}

/// Which per-repository listing a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Projects,
    Members,
    Repositories,
    Issues,
    Pulls,
    Commits,
    IssueComments,
    ReviewComments,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Projects => "projects",
            Resource::Members => "members",
            Resource::Repositories => "repositories",
            Resource::Issues => "issues",
            Resource::Pulls => "pulls",
            Resource::Commits => "commits",
            Resource::IssueComments => "issue comments",
            Resource::ReviewComments => "review comments",
        }
    }
}

/// A subresource fetch that was absorbed instead of failing the load.
#[derive(Debug, Clone, Serialize)]
pub struct SubresourceFailure {
    /// Repository name, or the organization for org-level listings.
    pub repository: String,
    pub resource: Resource,
    pub error: String,
    /// Whether the error suggests the quota ran out.
    pub quota_related: bool,
}

/// Everything the dashboard renders from one load.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub organization: String,
    pub members: Vec<Owner>,
    pub repositories: Vec<Repository>,
    pub projects: Vec<Project>,
    pub issues: Vec<DashboardIssue>,
    pub pull_requests: Vec<PullRecord>,
    pub commits: Vec<CommitRecord>,
    pub timeline: Vec<TimelineEvent>,
    pub rate_limit: RateLimitState,
    pub projects_from_cache: bool,
    pub failures: Vec<SubresourceFailure>,
    pub generated_at: DateTime<Utc>,
}
