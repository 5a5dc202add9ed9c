// List rendering for the dashboard tabs.
// Projects, cross-referenced issues and the activity timeline, with empty states.

use chrono::{DateTime, Utc};
use ratatui::{prelude::*, widgets::*};

use crate::model::{Dashboard, DashboardIssue, EventKind, Project, TimelineEvent};
use crate::state::SelectableList;

/// Format a timestamp as relative time (e.g., "2h ago").
pub fn format_relative_time(dt: &DateTime<Utc>) -> String {
    relative_to(dt, Utc::now())
}

fn relative_to(dt: &DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(*dt);

    if duration.num_days() > 0 {
        format!("{}d ago", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{}m ago", duration.num_minutes())
    } else {
        "just now".to_string()
    }
}

/// Color for a board status or raw issue state.
fn status_color(status: &str) -> Color {
    match status.to_ascii_lowercase().as_str() {
        "done" | "closed" => Color::Green,
        "in progress" | "in review" => Color::Yellow,
        "todo" | "open" | "backlog" => Color::Blue,
        _ => Color::White,
    }
}

fn kind_color(kind: EventKind) -> Color {
    match kind {
        EventKind::Commit => Color::Magenta,
        EventKind::IssueComment => Color::Cyan,
        EventKind::PrComment => Color::Green,
    }
}

pub fn render_loading(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(format!("⏳ {}...", message))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(text, area);
}

pub fn render_error(frame: &mut Frame, area: Rect, error: &str) {
    let text = Paragraph::new(format!("❌ {}", error))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(text, area);
}

pub fn render_empty(frame: &mut Frame, area: Rect, title: &str, message: &str) {
    let text = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", title)),
        );
    frame.render_widget(text, area);
}

fn selectable<'a>(items: Vec<ListItem<'a>>, title: String) -> List<'a> {
    List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ")
}

fn project_item(project: &Project) -> ListItem<'_> {
    let done = project
        .issues
        .iter()
        .filter(|i| i.status.as_deref().is_some_and(|s| s.eq_ignore_ascii_case("done")))
        .count();
    let mut spans = vec![
        Span::styled(
            format!("#{:<4}", project.number),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(&project.name, Style::default().fg(Color::Cyan)),
        Span::styled(
            format!("  {}/{} done", done, project.issues.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if let Some(description) = &project.description {
        spans.push(Span::styled(
            format!("  {}", description),
            Style::default().fg(Color::Gray),
        ));
    }
    ListItem::new(Line::from(spans))
}

pub fn render_projects(
    frame: &mut Frame,
    dashboard: &Dashboard,
    list: &mut SelectableList,
    area: Rect,
) {
    if dashboard.projects.is_empty() {
        render_empty(frame, area, "Projects", "No project boards found");
        return;
    }

    let items: Vec<ListItem> = dashboard.projects.iter().map(project_item).collect();
    let source = if dashboard.projects_from_cache {
        "cached"
    } else {
        "fresh"
    };
    let title = format!(" Projects ({}, {}) ", dashboard.projects.len(), source);
    frame.render_stateful_widget(selectable(items, title), area, &mut list.list_state);
}

fn issue_item(issue: &DashboardIssue) -> ListItem<'_> {
    let mut spans = vec![
        Span::styled(
            format!("{}#{} ", issue.repository, issue.number),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("[{}] ", issue.status),
            Style::default().fg(status_color(&issue.status)),
        ),
        Span::raw(&issue.title),
    ];
    if let Some(assignee) = &issue.assignee {
        spans.push(Span::styled(
            format!("  @{}", assignee),
            Style::default().fg(Color::Cyan),
        ));
    }
    if let Some(due) = issue.due_date {
        spans.push(Span::styled(
            format!("  due {}", due.format("%Y-%m-%d")),
            Style::default().fg(Color::Yellow),
        ));
    }
    ListItem::new(Line::from(spans))
}

pub fn render_issues(frame: &mut Frame, dashboard: &Dashboard, list: &mut SelectableList, area: Rect) {
    if dashboard.issues.is_empty() {
        render_empty(frame, area, "Issues", "No issues in this organization");
        return;
    }

    let items: Vec<ListItem> = dashboard.issues.iter().map(issue_item).collect();
    let title = format!(" Issues ({}) ", dashboard.issues.len());
    frame.render_stateful_widget(selectable(items, title), area, &mut list.list_state);
}

fn event_item(event: &TimelineEvent) -> ListItem<'_> {
    let target = match event.number {
        Some(number) => format!("{}#{}", event.repository, number),
        None => event.repository.clone(),
    };
    ListItem::new(Line::from(vec![
        Span::styled(
            format!("{:>9} ", format_relative_time(&event.timestamp)),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("{:<13} ", event.kind.label()),
            Style::default().fg(kind_color(event.kind)),
        ),
        Span::styled(format!("{} ", target), Style::default().fg(Color::DarkGray)),
        Span::styled(format!("{}: ", event.author), Style::default().fg(Color::Cyan)),
        Span::raw(&event.summary),
    ]))
}

pub fn render_timeline(
    frame: &mut Frame,
    dashboard: &Dashboard,
    list: &mut SelectableList,
    area: Rect,
) {
    if dashboard.timeline.is_empty() {
        render_empty(frame, area, "Timeline", "No recent activity");
        return;
    }

    let items: Vec<ListItem> = dashboard.timeline.iter().map(event_item).collect();
    let title = format!(" Timeline ({}) ", dashboard.timeline.len());
    frame.render_stateful_widget(selectable(items, title), area, &mut list.list_state);
}
