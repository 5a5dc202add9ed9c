// GitHub API endpoint functions.
// Typed methods for the REST listings and GraphQL queries the dashboard consumes.

use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::{BoardError, Result};

use super::client::GitHubClient;
use super::types::{
    Commit, Issue, IssueComment, ItemPage, Owner, OrganizationProjectsData, ProjectItemsData,
    ProjectPage, PullRequest, RateLimitData, RateLimitState, Repository, ReviewComment,
};

/// Page size for every list request.
pub const PER_PAGE: u32 = 100;

/// Upper bound on pages walked for any paginated listing.
pub const MAX_PAGES: u32 = 10;

const RATE_LIMIT_QUERY: &str = r#"
query {
  rateLimit { limit remaining used resetAt }
}
"#;

const ITEM_FIELDS: &str = r#"
  pageInfo { hasNextPage endCursor }
  nodes {
    content {
      ... on Issue {
        number title state
        repository { name }
        assignees(first: 10) { nodes { login } }
      }
      ... on PullRequest {
        number title state
        repository { name }
        assignees(first: 10) { nodes { login } }
      }
      ... on DraftIssue { title }
    }
    fieldValues(first: 20) {
      nodes {
        ... on ProjectV2ItemFieldDateValue {
          date
          field { ... on ProjectV2FieldCommon { name } }
        }
        ... on ProjectV2ItemFieldSingleSelectValue {
          name
          field { ... on ProjectV2FieldCommon { name } }
        }
        ... on ProjectV2ItemFieldTextValue {
          text
          field { ... on ProjectV2FieldCommon { name } }
        }
      }
    }
  }
"#;

fn projects_query() -> String {
    format!(
        r#"
query($org: String!, $after: String) {{
  organization(login: $org) {{
    projectsV2(first: 20, after: $after) {{
      pageInfo {{ hasNextPage endCursor }}
      nodes {{
        id number title shortDescription url
        items(first: 100) {{ {ITEM_FIELDS} }}
      }}
    }}
  }}
}}
"#
    )
}

fn project_items_query() -> String {
    format!(
        r#"
query($id: ID!, $after: String) {{
  node(id: $id) {{
    ... on ProjectV2 {{
      items(first: 100, after: $after) {{ {ITEM_FIELDS} }}
    }}
  }}
}}
"#
    )
}

impl GitHubClient {
    /// Query the GraphQL quota.
    pub async fn get_rate_limit(&self) -> Result<RateLimitState> {
        let data: RateLimitData = self.graphql(RATE_LIMIT_QUERY, json!({})).await?;
        Ok(data.rate_limit)
    }

    /// Get one page of the organization's project boards.
    pub async fn get_project_page(&self, org: &str, after: Option<&str>) -> Result<ProjectPage> {
        let data: OrganizationProjectsData = self
            .graphql(&projects_query(), json!({ "org": org, "after": after }))
            .await?;
        data.organization
            .map(|o| o.projects_v2)
            .ok_or_else(|| BoardError::NotFound(format!("organization {}", org)))
    }

    /// Get a continuation page of a project's items.
    pub async fn get_project_items_page(
        &self,
        project_id: &str,
        after: Option<&str>,
    ) -> Result<ItemPage> {
        let data: ProjectItemsData = self
            .graphql(
                &project_items_query(),
                json!({ "id": project_id, "after": after }),
            )
            .await?;
        data.node
            .map(|n| n.items)
            .ok_or_else(|| BoardError::NotFound(format!("project {}", project_id)))
    }

    /// Get members of an organization.
    pub async fn get_org_members(&self, org: &str) -> Result<Vec<Owner>> {
        self.get_all_pages(&format!("/orgs/{}/members", org), &[])
            .await
    }

    /// Get repositories for an organization.
    pub async fn get_org_repos(&self, org: &str) -> Result<Vec<Repository>> {
        self.get_all_pages(
            &format!("/orgs/{}/repos", org),
            &[("sort", "updated"), ("direction", "desc")],
        )
        .await
    }

    /// Get issues for a repository, excluding pull requests.
    pub async fn get_issues(&self, owner: &str, repo: &str) -> Result<Vec<Issue>> {
        let issues: Vec<Issue> = self
            .get_first_page(
                &format!("/repos/{}/{}/issues", owner, repo),
                &[("state", "all")],
            )
            .await?;
        Ok(issues.into_iter().filter(|i| !i.is_pull_request()).collect())
    }

    /// Get pull requests for a repository.
    pub async fn get_pulls(&self, owner: &str, repo: &str) -> Result<Vec<PullRequest>> {
        self.get_first_page(
            &format!("/repos/{}/{}/pulls", owner, repo),
            &[("state", "all")],
        )
        .await
    }

    /// Get recent commits for a repository. Empty repositories answer 409.
    pub async fn get_commits(&self, owner: &str, repo: &str) -> Result<Vec<Commit>> {
        self.get_first_page(&format!("/repos/{}/{}/commits", owner, repo), &[])
            .await
    }

    /// Get issue comments across a repository.
    pub async fn get_issue_comments(&self, owner: &str, repo: &str) -> Result<Vec<IssueComment>> {
        self.get_first_page(
            &format!("/repos/{}/{}/issues/comments", owner, repo),
            &[("sort", "created"), ("direction", "desc")],
        )
        .await
    }

    /// Get pull request review comments across a repository.
    pub async fn get_review_comments(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Vec<ReviewComment>> {
        self.get_first_page(
            &format!("/repos/{}/{}/pulls/comments", owner, repo),
            &[("sort", "created"), ("direction", "desc")],
        )
        .await
    }

    async fn get_first_page<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        extra: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let per_page = PER_PAGE.to_string();
        let mut params: Vec<(&str, &str)> = extra.to_vec();
        params.push(("per_page", &per_page));

        let response = self.get_with_params(endpoint, &params).await?;
        let items: Vec<T> = response.json().await?;
        Ok(items)
    }

    /// Walk pages until a short page comes back.
    async fn get_all_pages<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        extra: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let per_page = PER_PAGE.to_string();
        let mut all = Vec::new();

        for page in 1..=MAX_PAGES {
            let page = page.to_string();
            let mut params: Vec<(&str, &str)> = extra.to_vec();
            params.push(("per_page", &per_page));
            params.push(("page", &page));

            let response = self.get_with_params(endpoint, &params).await?;
            let items: Vec<T> = response.json().await?;
            let short = items.len() < PER_PAGE as usize;
            all.extend(items);
            if short {
                break;
            }
        }
        Ok(all)
    }
}
