// Wire-to-model conversion.
// Flattens project pages and resolves each issue's board status.

use crate::github::{Commit, Issue, ProjectItemNode, ProjectNode, PullRequest};
use crate::model::{CommitRecord, DashboardIssue, Project, ProjectIssue, ProjectRef, PullRecord};

const START_DATE_FIELD: &str = "Start date";
const DUE_DATE_FIELD: &str = "Due date";
const STATUS_FIELD: &str = "Status";

/// Flatten a project node and all of its item pages.
pub fn normalize_project(node: ProjectNode, items: Vec<ProjectItemNode>) -> Project {
    Project {
        issues: items.iter().filter_map(project_issue).collect(),
        id: node.id,
        number: node.number,
        name: node.title,
        description: node.short_description.filter(|d| !d.is_empty()),
        url: node.url,
    }
}

/// Issue-status link for an item. Draft issues and redacted items have no link.
fn project_issue(item: &ProjectItemNode) -> Option<ProjectIssue> {
    let content = item.content.as_ref()?;
    let number = content.number?;
    let repository = content.repository.as_ref()?.name.clone();

    let field = |name: &str| {
        item.field_values
            .nodes
            .iter()
            .find(|value| value.field_name().is_some_and(|f| f.eq_ignore_ascii_case(name)))
    };

    Some(ProjectIssue {
        number,
        repository,
        start_date: field(START_DATE_FIELD).and_then(|v| v.date),
        due_date: field(DUE_DATE_FIELD).and_then(|v| v.date),
        status: field(STATUS_FIELD).and_then(|v| v.name.clone().or_else(|| v.text.clone())),
        assignee: content.assignees.nodes.first().map(|u| u.login.clone()),
    })
}

/// Board entry for `(number, repository)`. Projects are scanned in list order and
/// the first one tracking the issue wins.
pub fn resolve_issue_status<'a>(
    projects: &'a [Project],
    number: u64,
    repository: &str,
) -> Option<(&'a Project, &'a ProjectIssue)> {
    projects.iter().find_map(|project| {
        project
            .find_issue(number, repository)
            .map(|entry| (project, entry))
    })
}

/// Attach board status, dates and project reference to a REST issue.
pub fn cross_reference(repository: &str, issue: Issue, projects: &[Project]) -> DashboardIssue {
    let raw_state = issue.state.as_str().to_string();
    let linked = resolve_issue_status(projects, issue.number, repository);

    let (status, project, start_date, due_date) = match linked {
        Some((project, entry)) => (
            entry.status.clone().unwrap_or_else(|| raw_state.clone()),
            Some(ProjectRef {
                id: project.id.clone(),
                number: project.number,
                name: project.name.clone(),
            }),
            entry.start_date,
            entry.due_date,
        ),
        None => (raw_state.clone(), None, None, None),
    };

    let assignee = issue
        .assignee
        .map(|a| a.login)
        .or_else(|| linked.and_then(|(_, entry)| entry.assignee.clone()));

    DashboardIssue {
        repository: repository.to_string(),
        number: issue.number,
        title: issue.title,
        state: raw_state,
        status,
        project,
        start_date,
        due_date,
        assignee,
        author: issue.user.map(|u| u.login),
        body: issue.body,
        comments: issue.comments,
        url: issue.html_url,
        created_at: issue.created_at,
        updated_at: issue.updated_at,
        closed_at: issue.closed_at,
    }
}

pub fn pull_record(repository: &str, pull: PullRequest) -> PullRecord {
    PullRecord {
        repository: repository.to_string(),
        number: pull.number,
        title: pull.title,
        state: pull.state.as_str().to_string(),
        draft: pull.draft,
        author: pull.user.map(|u| u.login),
        url: pull.html_url,
        created_at: pull.created_at,
        updated_at: pull.updated_at,
        merged_at: pull.merged_at,
    }
}

pub fn commit_record(repository: &str, commit: Commit) -> CommitRecord {
    let signature = commit.commit.author.as_ref().or(commit.commit.committer.as_ref());
    let author = commit
        .author
        .as_ref()
        .map(|a| a.login.clone())
        .or_else(|| signature.and_then(|s| s.name.clone()))
        .unwrap_or_else(|| "unknown".to_string());

    CommitRecord {
        repository: repository.to_string(),
        date: signature.and_then(|s| s.date),
        sha: commit.sha,
        message: commit.commit.message,
        author,
        url: Some(commit.html_url),
        placeholder: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::fake::{self, item, project, with_assignee, with_date};
    use crate::github::IssueState;
    use chrono::NaiveDate;

    fn flatten(node: ProjectNode) -> Project {
        let items = node.items.nodes.clone();
        normalize_project(node, items)
    }

    #[test]
    fn test_normalize_extracts_named_fields() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let due = NaiveDate::from_ymd_opt(2024, 2, 14).unwrap();
        let entry = item(5, "x", Some("In Progress"));
        let entry = with_date(entry, "Start date", start);
        // Field names match case-insensitively.
        let entry = with_date(entry, "due DATE", due);
        let entry = with_assignee(entry, "carol");

        let project = flatten(project("PVT_1", 1, vec![entry]));

        assert_eq!(project.name, "Board 1");
        assert_eq!(
            project.issues,
            vec![ProjectIssue {
                number: 5,
                repository: "x".to_string(),
                start_date: Some(start),
                due_date: Some(due),
                status: Some("In Progress".to_string()),
                assignee: Some("carol".to_string()),
            }]
        );
    }

    #[test]
    fn test_normalize_skips_draft_items() {
        let mut draft = item(1, "x", None);
        draft.content.as_mut().unwrap().number = None;
        draft.content.as_mut().unwrap().repository = None;
        let redacted = ProjectItemNode::default();

        let project = flatten(project("PVT_1", 1, vec![draft, redacted, item(2, "x", None)]));

        assert_eq!(project.issues.len(), 1);
        assert_eq!(project.issues[0].number, 2);
        assert_eq!(project.issues[0].status, None);
    }

    #[test]
    fn test_first_project_wins() {
        let a = flatten(project("A", 1, vec![item(5, "x", Some("Done"))]));
        let b = flatten(project("B", 2, vec![item(5, "x", Some("Todo"))]));

        let projects = vec![a.clone(), b.clone()];
        let (found, entry) = resolve_issue_status(&projects, 5, "x").unwrap();
        assert_eq!(found.id, "A");
        assert_eq!(entry.status.as_deref(), Some("Done"));

        let reversed = vec![b, a];
        let (found, _) = resolve_issue_status(&reversed, 5, "x").unwrap();
        assert_eq!(found.id, "B");
    }

    #[test]
    fn test_match_requires_number_and_repository() {
        let projects = vec![flatten(project("A", 1, vec![item(5, "x", Some("Done"))]))];
        assert!(resolve_issue_status(&projects, 5, "y").is_none());
        assert!(resolve_issue_status(&projects, 6, "x").is_none());
    }

    #[test]
    fn test_cross_reference_uses_board_status() {
        let due = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let projects = vec![flatten(project(
            "A",
            1,
            vec![with_date(item(5, "x", Some("Done")), "Due date", due)],
        ))];

        let issue = cross_reference("x", fake::issue(5, IssueState::Open), &projects);

        assert_eq!(issue.status, "Done");
        assert_eq!(issue.state, "open");
        assert_eq!(issue.due_date, Some(due));
        assert_eq!(issue.project.unwrap().id, "A");
    }

    #[test]
    fn test_cross_reference_falls_back_to_raw_state() {
        let projects = vec![flatten(project("A", 1, vec![item(9, "x", None)]))];

        let untracked = cross_reference("x", fake::issue(5, IssueState::Closed), &projects);
        assert_eq!(untracked.status, "closed");
        assert!(untracked.project.is_none());

        let no_status = cross_reference("x", fake::issue(9, IssueState::Open), &projects);
        assert_eq!(no_status.status, "open");
        assert!(no_status.project.is_some());
    }

    #[test]
    fn test_commit_record_prefers_account_login() {
        let record = commit_record("x", fake::commit("abc123", "dave", fake::at(10, 0)));
        assert_eq!(record.author, "dave");
        assert_eq!(record.date, Some(fake::at(10, 0)));
        assert!(!record.placeholder);

        let mut anonymous = fake::commit("def456", "erin", fake::at(11, 0));
        anonymous.author = None;
        let record = commit_record("x", anonymous);
        assert_eq!(record.author, "erin");
    }
}
