// GitHub API response types.
// REST payloads for org/repo listings and GraphQL payloads for project boards and quota.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Owner type discriminator (user, organization or bot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OwnerType {
    #[default]
    User,
    Organization,
    Bot,
    #[serde(other)]
    Unknown,
}

/// GitHub user or organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    pub id: u64,
    pub login: String,
    #[serde(rename = "type", default)]
    pub owner_type: OwnerType,
    pub avatar_url: Option<String>,
    pub html_url: Option<String>,
}

/// GitHub repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub owner: Owner,
    pub private: bool,
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub archived: bool,
    pub updated_at: DateTime<Utc>,
    pub pushed_at: Option<DateTime<Utc>>,
}

/// Open/closed state shared by issues and pull requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
    #[serde(other)]
    Unknown,
}

impl IssueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueState::Open => "open",
            IssueState::Closed => "closed",
            IssueState::Unknown => "unknown",
        }
    }
}

/// Issue label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    pub color: Option<String>,
}

/// Marker present on issues-endpoint entries that are really pull requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestMarker {
    pub url: Option<String>,
}

/// Issue as returned by the REST issues endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub state: IssueState,
    pub body: Option<String>,
    pub user: Option<Owner>,
    pub assignee: Option<Owner>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub comments: u64,
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub pull_request: Option<PullRequestMarker>,
}

impl Issue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

/// Pull request as returned by the REST pulls endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub state: IssueState,
    pub body: Option<String>,
    pub user: Option<Owner>,
    pub assignee: Option<Owner>,
    #[serde(default)]
    pub draft: bool,
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub merged_at: Option<DateTime<Utc>>,
}

/// Git author/committer signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitSignature {
    pub name: Option<String>,
    pub email: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

/// Git-level commit details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitDetail {
    pub message: String,
    pub author: Option<GitSignature>,
    pub committer: Option<GitSignature>,
}

/// Commit as returned by the REST commits endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub html_url: String,
    pub commit: CommitDetail,
    /// GitHub account linked to the commit author, when one matches.
    pub author: Option<Owner>,
}

/// Comment on an issue (or on a pull request's conversation).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueComment {
    pub id: u64,
    pub body: Option<String>,
    pub user: Option<Owner>,
    pub html_url: String,
    pub issue_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Review comment on a pull request diff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewComment {
    pub id: u64,
    pub body: Option<String>,
    pub user: Option<Owner>,
    pub html_url: String,
    pub pull_request_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Trailing number of an API URL such as `.../issues/42`.
pub fn trailing_number(url: &str) -> Option<u64> {
    url.rsplit('/').next().and_then(|segment| segment.parse().ok())
}

/// Upstream quota snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitState {
    pub limit: u64,
    pub remaining: u64,
    pub used: u64,
    pub reset_at: DateTime<Utc>,
}

impl RateLimitState {
    /// Fail-safe snapshot: no quota left until `reset_at`.
    pub fn exhausted_until(reset_at: DateTime<Utc>) -> Self {
        Self {
            limit: 0,
            remaining: 0,
            used: 0,
            reset_at,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

/// Quota observed from REST response headers.
#[derive(Debug, Clone, Default)]
pub struct HeaderQuota {
    pub limit: Option<u64>,
    pub remaining: Option<u64>,
    /// Unix seconds.
    pub reset: Option<i64>,
}

// GraphQL payloads.

/// Envelope for every GraphQL response.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub message: String,
}

/// Cursor pagination info.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitData {
    pub rate_limit: RateLimitState,
}

#[derive(Debug, Deserialize)]
pub struct OrganizationProjectsData {
    pub organization: Option<OrganizationProjects>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationProjects {
    pub projects_v2: ProjectPage,
}

/// One page of organization project boards.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPage {
    pub page_info: PageInfo,
    #[serde(default)]
    pub nodes: Vec<ProjectNode>,
}

/// Project board with its first page of items.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectNode {
    pub id: String,
    pub number: u64,
    pub title: String,
    pub short_description: Option<String>,
    pub url: String,
    #[serde(default)]
    pub items: ItemPage,
}

#[derive(Debug, Deserialize)]
pub struct ProjectItemsData {
    pub node: Option<ProjectItemsNode>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectItemsNode {
    pub items: ItemPage,
}

/// One page of project items.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPage {
    pub page_info: PageInfo,
    #[serde(default)]
    pub nodes: Vec<ProjectItemNode>,
}

/// Project item: the linked issue/PR plus its custom field values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectItemNode {
    pub content: Option<ItemContent>,
    #[serde(default)]
    pub field_values: FieldValueConnection,
}

/// Linked content. Draft issues carry no number or repository.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemContent {
    pub number: Option<u64>,
    pub title: Option<String>,
    pub state: Option<String>,
    pub repository: Option<RepositoryRef>,
    #[serde(default)]
    pub assignees: UserConnection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryRef {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserConnection {
    #[serde(default)]
    pub nodes: Vec<UserRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserRef {
    pub login: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldValueConnection {
    #[serde(default)]
    pub nodes: Vec<FieldValue>,
}

/// A custom field value. Unsupported field types arrive as empty objects.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldValue {
    pub field: Option<FieldRef>,
    /// Set for date fields.
    pub date: Option<NaiveDate>,
    /// Set for single-select fields.
    pub name: Option<String>,
    /// Set for text fields.
    pub text: Option<String>,
}

impl FieldValue {
    pub fn field_name(&self) -> Option<&str> {
        self.field.as_ref().and_then(|f| f.name.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldRef {
    pub name: Option<String>,
}
