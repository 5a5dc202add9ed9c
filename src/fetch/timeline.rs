// Activity timeline synthesis.
// Merges commits and comments into one feed, minus automation accounts.

use crate::github::{IssueComment, ReviewComment, trailing_number};
use crate::model::{CommitRecord, EventKind, TimelineEvent};

/// Login prefixes of known automation accounts.
const BOT_PREFIXES: [&str; 5] = [
    "dependabot",
    "renovate",
    "semantic-release",
    "vercel",
    "github-actions",
];

const SUMMARY_LIMIT: usize = 100;

/// Login used by GitHub for deleted accounts.
const GHOST: &str = "ghost";

/// Whether a login belongs to a bot or system account. Case-insensitive.
pub fn is_bot_login(login: &str) -> bool {
    let login = login.to_ascii_lowercase();
    login.ends_with("[bot]")
        || login == "system"
        || BOT_PREFIXES.iter().any(|prefix| login.starts_with(prefix))
}

/// Comment events tagged with their repository.
pub struct RepoComments<'a, T> {
    pub repository: &'a str,
    pub comments: &'a [T],
}

/// Merge commits, issue comments and review comments into a bot-free feed,
/// newest first.
pub fn build_timeline(
    commits: &[CommitRecord],
    issue_comments: &[RepoComments<'_, IssueComment>],
    review_comments: &[RepoComments<'_, ReviewComment>],
) -> Vec<TimelineEvent> {
    let mut events: Vec<TimelineEvent> = Vec::new();

    events.extend(commits.iter().filter(|c| !c.placeholder).filter_map(|c| {
        Some(TimelineEvent {
            kind: EventKind::Commit,
            repository: c.repository.clone(),
            author: c.author.clone(),
            timestamp: c.date?,
            summary: summarize(&c.message),
            url: c.url.clone().unwrap_or_default(),
            number: None,
        })
    }));

    for group in issue_comments {
        events.extend(group.comments.iter().map(|c| TimelineEvent {
            kind: EventKind::IssueComment,
            repository: group.repository.to_string(),
            author: login_or_ghost(c.user.as_ref().map(|u| u.login.as_str())),
            timestamp: c.created_at,
            summary: summarize(c.body.as_deref().unwrap_or_default()),
            url: c.html_url.clone(),
            number: trailing_number(&c.issue_url),
        }));
    }

    for group in review_comments {
        events.extend(group.comments.iter().map(|c| TimelineEvent {
            kind: EventKind::PrComment,
            repository: group.repository.to_string(),
            author: login_or_ghost(c.user.as_ref().map(|u| u.login.as_str())),
            timestamp: c.created_at,
            summary: summarize(c.body.as_deref().unwrap_or_default()),
            url: c.html_url.clone(),
            number: trailing_number(&c.pull_request_url),
        }));
    }

    events.retain(|e| !is_bot_login(&e.author));
    sort_newest_first(&mut events);
    events
}

/// Descending by timestamp. Stable, so equal timestamps keep merge order.
pub fn sort_newest_first(events: &mut [TimelineEvent]) {
    events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

fn login_or_ghost(login: Option<&str>) -> String {
    login.unwrap_or(GHOST).to_string()
}

/// First non-blank line, capped at `SUMMARY_LIMIT` characters.
fn summarize(text: &str) -> String {
    let line = text
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default();

    if line.chars().count() > SUMMARY_LIMIT {
        let cut: String = line.chars().take(SUMMARY_LIMIT - 1).collect();
        format!("{}…", cut)
    } else {
        line.to_string()
    }
}
