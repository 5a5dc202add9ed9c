// In-memory data source for tests.
// Counts every upstream call and injects per-repository failures.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::error::{BoardError, Result};
use crate::github::{
    Commit, CommitDetail, DashboardSource, FieldRef, FieldValue, FieldValueConnection, GitSignature,
    Issue, IssueComment, IssueState, ItemContent, ItemPage, Owner, OwnerType, PageInfo,
    ProjectItemNode, ProjectNode, ProjectPage, PullRequest, RateLimitState, Repository,
    RepositoryRef, ReviewComment, UserConnection, UserRef,
};
use crate::model::Resource;

#[derive(Debug, Default)]
pub struct CallCounts {
    rate_limit: AtomicUsize,
    project_pages: AtomicUsize,
    item_pages: AtomicUsize,
    members: AtomicUsize,
    repositories: AtomicUsize,
    issues: AtomicUsize,
    pulls: AtomicUsize,
    commits: AtomicUsize,
    issue_comments: AtomicUsize,
    review_comments: AtomicUsize,
}

impl CallCounts {
    pub fn rate_limit(&self) -> usize {
        self.rate_limit.load(Ordering::SeqCst)
    }

    pub fn project_pages(&self) -> usize {
        self.project_pages.load(Ordering::SeqCst)
    }

    pub fn item_pages(&self) -> usize {
        self.item_pages.load(Ordering::SeqCst)
    }

    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    /// Every call except quota probes.
    pub fn data(&self) -> usize {
        [
            &self.project_pages,
            &self.item_pages,
            &self.members,
            &self.repositories,
            &self.issues,
            &self.pulls,
            &self.commits,
            &self.issue_comments,
            &self.review_comments,
        ]
        .iter()
        .map(|c| c.load(Ordering::SeqCst))
        .sum()
    }

    /// Every call including quota probes.
    pub fn total(&self) -> usize {
        self.data() + self.rate_limit()
    }
}

fn bump(counter: &AtomicUsize) {
    counter.fetch_add(1, Ordering::SeqCst);
}

pub struct FakeSource {
    pub calls: CallCounts,
    quota: Option<RateLimitState>,
    latency: Option<Duration>,
    fail_projects: bool,
    throttle_projects: bool,
    project_pages: Vec<Vec<ProjectNode>>,
    extra_items: HashMap<String, Vec<Vec<ProjectItemNode>>>,
    members: Vec<Owner>,
    repositories: Vec<Repository>,
    issues: HashMap<String, Vec<Issue>>,
    pulls: HashMap<String, Vec<PullRequest>>,
    commits: HashMap<String, Vec<Commit>>,
    issue_comments: HashMap<String, Vec<IssueComment>>,
    review_comments: HashMap<String, Vec<ReviewComment>>,
    failures: HashSet<(Resource, String)>,
    throttled: HashSet<(Resource, String)>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self {
            calls: CallCounts::default(),
            quota: Some(RateLimitState {
                limit: 5000,
                remaining: 5000,
                used: 0,
                reset_at: Utc::now() + chrono::Duration::hours(1),
            }),
            latency: None,
            fail_projects: false,
            throttle_projects: false,
            project_pages: Vec::new(),
            extra_items: HashMap::new(),
            members: Vec::new(),
            repositories: Vec::new(),
            issues: HashMap::new(),
            pulls: HashMap::new(),
            commits: HashMap::new(),
            issue_comments: HashMap::new(),
            review_comments: HashMap::new(),
            failures: HashSet::new(),
            throttled: HashSet::new(),
        }
    }

    pub fn with_quota(mut self, limit: u64, remaining: u64, reset_at: DateTime<Utc>) -> Self {
        self.quota = Some(RateLimitState {
            limit,
            remaining,
            used: limit.saturating_sub(remaining),
            reset_at,
        });
        self
    }

    pub fn failing_rate_limit(mut self) -> Self {
        self.quota = None;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn failing_projects(mut self) -> Self {
        self.fail_projects = true;
        self
    }

    /// Project queries fail the way GraphQL reports an exhausted quota.
    pub fn throttling_projects(mut self) -> Self {
        self.throttle_projects = true;
        self
    }

    pub fn quota_reset(&self) -> DateTime<Utc> {
        self.quota.as_ref().map(|q| q.reset_at).unwrap_or_default()
    }

    /// Project boards split into GraphQL pages.
    pub fn with_project_pages(mut self, pages: Vec<Vec<ProjectNode>>) -> Self {
        self.project_pages = pages;
        self
    }

    /// Continuation item pages for a project whose first page reports more.
    pub fn with_extra_items(mut self, project_id: &str, pages: Vec<Vec<ProjectItemNode>>) -> Self {
        self.extra_items.insert(project_id.to_string(), pages);
        self
    }

    pub fn with_members(mut self, logins: &[&str]) -> Self {
        self.members = logins.iter().map(|l| owner(l)).collect();
        self
    }

    pub fn with_repo(mut self, name: &str) -> Self {
        self.repositories.push(repository(name));
        self
    }

    pub fn with_issues(mut self, repo: &str, issues: Vec<Issue>) -> Self {
        self.issues.insert(repo.to_string(), issues);
        self
    }

    pub fn with_pulls(mut self, repo: &str, pulls: Vec<PullRequest>) -> Self {
        self.pulls.insert(repo.to_string(), pulls);
        self
    }

    pub fn with_commits(mut self, repo: &str, commits: Vec<Commit>) -> Self {
        self.commits.insert(repo.to_string(), commits);
        self
    }

    pub fn with_issue_comments(mut self, repo: &str, comments: Vec<IssueComment>) -> Self {
        self.issue_comments.insert(repo.to_string(), comments);
        self
    }

    pub fn with_review_comments(mut self, repo: &str, comments: Vec<ReviewComment>) -> Self {
        self.review_comments.insert(repo.to_string(), comments);
        self
    }

    /// Make one repository's listing fail with a transport-style error.
    pub fn failing(mut self, resource: Resource, repo: &str) -> Self {
        self.failures.insert((resource, repo.to_string()));
        self
    }

    /// Make one repository's listing fail with a quota error.
    pub fn throttled(mut self, resource: Resource, repo: &str) -> Self {
        self.throttled.insert((resource, repo.to_string()));
        self
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn check(&self, resource: Resource, repo: &str) -> Result<()> {
        let key = (resource, repo.to_string());
        if self.throttled.contains(&key) {
            return Err(BoardError::RateLimited {
                reset_at: Utc::now() + chrono::Duration::minutes(30),
            });
        }
        if self.failures.contains(&key) {
            return Err(BoardError::Other(format!(
                "HTTP 409 Conflict: {} for {}",
                resource.as_str(),
                repo
            )));
        }
        Ok(())
    }

    fn listing<T: Clone>(
        &self,
        map: &HashMap<String, Vec<T>>,
        resource: Resource,
        repo: &str,
    ) -> Result<Vec<T>> {
        self.check(resource, repo)?;
        Ok(map.get(repo).cloned().unwrap_or_default())
    }
}

fn cursor_index(after: Option<&str>, prefix: char) -> usize {
    after
        .and_then(|c| c.strip_prefix(prefix))
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

#[async_trait]
impl DashboardSource for FakeSource {
    async fn rate_limit(&self) -> Result<RateLimitState> {
        bump(&self.calls.rate_limit);
        self.delay().await;
        self.quota
            .clone()
            .ok_or_else(|| BoardError::Other("connection refused".to_string()))
    }

    async fn project_page(&self, _org: &str, after: Option<&str>) -> Result<ProjectPage> {
        bump(&self.calls.project_pages);
        self.delay().await;
        if self.fail_projects {
            return Err(BoardError::GraphQl("something went wrong".to_string()));
        }
        if self.throttle_projects {
            return Err(BoardError::GraphQl(
                "API rate limit exceeded for user ID 1.".to_string(),
            ));
        }

        let index = cursor_index(after, 'p');
        let has_next_page = index + 1 < self.project_pages.len();
        Ok(ProjectPage {
            page_info: PageInfo {
                has_next_page,
                end_cursor: has_next_page.then(|| format!("p{}", index + 1)),
            },
            nodes: self.project_pages.get(index).cloned().unwrap_or_default(),
        })
    }

    async fn project_items_page(&self, project_id: &str, after: Option<&str>) -> Result<ItemPage> {
        bump(&self.calls.item_pages);
        self.delay().await;

        let pages = self.extra_items.get(project_id).cloned().unwrap_or_default();
        // Cursor "iN" asks for continuation page N, counted from 1.
        let index = cursor_index(after, 'i').saturating_sub(1);
        let has_next_page = index + 1 < pages.len();
        Ok(ItemPage {
            page_info: PageInfo {
                has_next_page,
                end_cursor: has_next_page.then(|| format!("i{}", index + 2)),
            },
            nodes: pages.get(index).cloned().unwrap_or_default(),
        })
    }

    async fn members(&self, org: &str) -> Result<Vec<Owner>> {
        bump(&self.calls.members);
        self.delay().await;
        self.check(Resource::Members, org)?;
        Ok(self.members.clone())
    }

    async fn repositories(&self, org: &str) -> Result<Vec<Repository>> {
        bump(&self.calls.repositories);
        self.delay().await;
        self.check(Resource::Repositories, org)?;
        Ok(self.repositories.clone())
    }

    async fn issues(&self, _owner: &str, repo: &str) -> Result<Vec<Issue>> {
        bump(&self.calls.issues);
        self.delay().await;
        self.listing(&self.issues, Resource::Issues, repo)
    }

    async fn pulls(&self, _owner: &str, repo: &str) -> Result<Vec<PullRequest>> {
        bump(&self.calls.pulls);
        self.delay().await;
        self.listing(&self.pulls, Resource::Pulls, repo)
    }

    async fn commits(&self, _owner: &str, repo: &str) -> Result<Vec<Commit>> {
        bump(&self.calls.commits);
        self.delay().await;
        self.listing(&self.commits, Resource::Commits, repo)
    }

    async fn issue_comments(&self, _owner: &str, repo: &str) -> Result<Vec<IssueComment>> {
        bump(&self.calls.issue_comments);
        self.delay().await;
        self.listing(&self.issue_comments, Resource::IssueComments, repo)
    }

    async fn review_comments(&self, _owner: &str, repo: &str) -> Result<Vec<ReviewComment>> {
        bump(&self.calls.review_comments);
        self.delay().await;
        self.listing(&self.review_comments, Resource::ReviewComments, repo)
    }
}

// Fixture builders.

pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, hour, minute, 0).unwrap()
}

pub fn owner(login: &str) -> Owner {
    Owner {
        id: login.len() as u64,
        login: login.to_string(),
        owner_type: OwnerType::User,
        avatar_url: None,
        html_url: None,
    }
}

pub fn repository(name: &str) -> Repository {
    Repository {
        id: name.len() as u64,
        name: name.to_string(),
        full_name: format!("acme/{}", name),
        owner: owner("acme"),
        private: false,
        description: None,
        html_url: format!("https://github.com/acme/{}", name),
        archived: false,
        updated_at: at(9, 0),
        pushed_at: None,
    }
}

pub fn issue(number: u64, state: IssueState) -> Issue {
    Issue {
        id: number,
        number,
        title: format!("Issue {}", number),
        state,
        body: None,
        user: Some(owner("alice")),
        assignee: None,
        labels: Vec::new(),
        comments: 0,
        html_url: format!("https://github.com/acme/x/issues/{}", number),
        created_at: at(8, 0),
        updated_at: at(8, 30),
        closed_at: None,
        pull_request: None,
    }
}

pub fn pull(number: u64) -> PullRequest {
    PullRequest {
        id: number,
        number,
        title: format!("PR {}", number),
        state: IssueState::Open,
        body: None,
        user: Some(owner("bob")),
        assignee: None,
        draft: false,
        html_url: format!("https://github.com/acme/x/pull/{}", number),
        created_at: at(8, 0),
        updated_at: at(8, 0),
        closed_at: None,
        merged_at: None,
    }
}

pub fn commit(sha: &str, login: &str, date: DateTime<Utc>) -> Commit {
    Commit {
        sha: sha.to_string(),
        html_url: format!("https://github.com/acme/x/commit/{}", sha),
        commit: CommitDetail {
            message: format!("Commit {}\n\nDetails", sha),
            author: Some(GitSignature {
                name: Some(login.to_string()),
                email: None,
                date: Some(date),
            }),
            committer: None,
        },
        author: Some(owner(login)),
    }
}

pub fn issue_comment(id: u64, login: &str, issue: u64, created_at: DateTime<Utc>) -> IssueComment {
    IssueComment {
        id,
        body: Some(format!("Comment {}", id)),
        user: Some(owner(login)),
        html_url: format!("https://github.com/acme/x/issues/{}#issuecomment-{}", issue, id),
        issue_url: format!("https://api.github.com/repos/acme/x/issues/{}", issue),
        created_at,
        updated_at: created_at,
    }
}

pub fn review_comment(id: u64, login: &str, pull: u64, created_at: DateTime<Utc>) -> ReviewComment {
    ReviewComment {
        id,
        body: Some(format!("Review {}", id)),
        user: Some(owner(login)),
        html_url: format!("https://github.com/acme/x/pull/{}#discussion_r{}", pull, id),
        pull_request_url: format!("https://api.github.com/repos/acme/x/pulls/{}", pull),
        created_at,
        updated_at: created_at,
    }
}

/// Project item linked to `repo#number` with an optional Status value.
pub fn item(number: u64, repo: &str, status: Option<&str>) -> ProjectItemNode {
    let mut values = vec![FieldValue::default()];
    if let Some(status) = status {
        values.push(FieldValue {
            field: Some(FieldRef {
                name: Some("Status".to_string()),
            }),
            name: Some(status.to_string()),
            ..FieldValue::default()
        });
    }
    ProjectItemNode {
        content: Some(ItemContent {
            number: Some(number),
            title: Some(format!("Issue {}", number)),
            state: Some("OPEN".to_string()),
            repository: Some(RepositoryRef {
                name: repo.to_string(),
            }),
            assignees: UserConnection::default(),
        }),
        field_values: FieldValueConnection { nodes: values },
    }
}

/// Add a date field to an item.
pub fn with_date(mut item: ProjectItemNode, field: &str, date: NaiveDate) -> ProjectItemNode {
    item.field_values.nodes.push(FieldValue {
        field: Some(FieldRef {
            name: Some(field.to_string()),
        }),
        date: Some(date),
        ..FieldValue::default()
    });
    item
}

/// Set the first assignee on an item.
pub fn with_assignee(mut item: ProjectItemNode, login: &str) -> ProjectItemNode {
    if let Some(content) = item.content.as_mut() {
        content.assignees.nodes.push(UserRef {
            login: login.to_string(),
        });
    }
    item
}

pub fn project(id: &str, number: u64, items: Vec<ProjectItemNode>) -> ProjectNode {
    ProjectNode {
        id: id.to_string(),
        number,
        title: format!("Board {}", number),
        short_description: None,
        url: format!("https://github.com/orgs/acme/projects/{}", number),
        items: ItemPage {
            page_info: PageInfo::default(),
            nodes: items,
        },
    }
}

/// Mark a project's first item page as having a continuation.
pub fn with_more_items(mut project: ProjectNode) -> ProjectNode {
    project.items.page_info = PageInfo {
        has_next_page: true,
        end_cursor: Some("i1".to_string()),
    };
    project
}
