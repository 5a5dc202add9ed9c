// Upstream data source seam.
// The orchestrator talks to this trait; the GitHub client is the production implementation.

use async_trait::async_trait;

use crate::error::Result;

use super::client::GitHubClient;
use super::types::{
    Commit, Issue, IssueComment, ItemPage, Owner, ProjectPage, PullRequest, RateLimitState,
    Repository, ReviewComment,
};

#[async_trait]
pub trait DashboardSource: Send + Sync + 'static {
    /// Lightweight quota check.
    async fn rate_limit(&self) -> Result<RateLimitState>;

    async fn project_page(&self, org: &str, after: Option<&str>) -> Result<ProjectPage>;

    async fn project_items_page(&self, project_id: &str, after: Option<&str>) -> Result<ItemPage>;

    async fn members(&self, org: &str) -> Result<Vec<Owner>>;

    async fn repositories(&self, org: &str) -> Result<Vec<Repository>>;

    async fn issues(&self, owner: &str, repo: &str) -> Result<Vec<Issue>>;

    async fn pulls(&self, owner: &str, repo: &str) -> Result<Vec<PullRequest>>;

    async fn commits(&self, owner: &str, repo: &str) -> Result<Vec<Commit>>;

    async fn issue_comments(&self, owner: &str, repo: &str) -> Result<Vec<IssueComment>>;

    async fn review_comments(&self, owner: &str, repo: &str) -> Result<Vec<ReviewComment>>;
}

#[async_trait]
impl DashboardSource for GitHubClient {
    async fn rate_limit(&self) -> Result<RateLimitState> {
        self.get_rate_limit().await
    }

    async fn project_page(&self, org: &str, after: Option<&str>) -> Result<ProjectPage> {
        self.get_project_page(org, after).await
    }

    async fn project_items_page(&self, project_id: &str, after: Option<&str>) -> Result<ItemPage> {
        self.get_project_items_page(project_id, after).await
    }

    async fn members(&self, org: &str) -> Result<Vec<Owner>> {
        self.get_org_members(org).await
    }

    async fn repositories(&self, org: &str) -> Result<Vec<Repository>> {
        self.get_org_repos(org).await
    }

    async fn issues(&self, owner: &str, repo: &str) -> Result<Vec<Issue>> {
        self.get_issues(owner, repo).await
    }

    async fn pulls(&self, owner: &str, repo: &str) -> Result<Vec<PullRequest>> {
        self.get_pulls(owner, repo).await
    }

    async fn commits(&self, owner: &str, repo: &str) -> Result<Vec<Commit>> {
        self.get_commits(owner, repo).await
    }

    async fn issue_comments(&self, owner: &str, repo: &str) -> Result<Vec<IssueComment>> {
        self.get_issue_comments(owner, repo).await
    }

    async fn review_comments(&self, owner: &str, repo: &str) -> Result<Vec<ReviewComment>> {
        self.get_review_comments(owner, repo).await
    }
}
