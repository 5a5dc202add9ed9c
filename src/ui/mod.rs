// UI module for rendering the TUI.
// Contains the tab bar, per-tab lists, the rate-limited panel and the status bar.

mod list;
mod modal;
mod tabs;

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, Tab};
use crate::cache::CacheInfo;
use crate::github::{DashboardSource, RateLimitState};
use crate::state::LoadingState;

/// Main draw function that renders the entire UI.
pub fn draw<S: DashboardSource>(frame: &mut Frame, app: &mut App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    tabs::draw_tabs(
        frame,
        app.active_tab,
        app.orchestrator().organization(),
        app.state.dashboard(),
        chunks[0],
    );

    draw_content(frame, app, chunks[1]);

    let quota = app.orchestrator().rate_limit();
    let cache = app.orchestrator().projects_cache_info();
    draw_status_bar(frame, app.state.refreshing, quota.as_ref(), cache.as_ref(), chunks[2]);

    // Help overlay (rendered last, on top of everything)
    if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Draw the main content area based on load state and active tab.
fn draw_content<S: DashboardSource>(frame: &mut Frame, app: &mut App<S>, area: Rect) {
    let tab = app.active_tab;
    let state = &mut app.state;

    match &state.data {
        LoadingState::Idle => list::render_empty(frame, area, tab.title(), "Press r to load"),
        LoadingState::Loading => list::render_loading(frame, area, "Loading dashboard"),
        LoadingState::Error(e) => list::render_error(frame, area, e),
        LoadingState::RateLimited { reset_at } => modal::draw_rate_limited(frame, area, *reset_at),
        LoadingState::Loaded(dashboard) => match tab {
            Tab::Projects => list::render_projects(frame, dashboard, &mut state.projects, area),
            Tab::Issues => list::render_issues(frame, dashboard, &mut state.issues, area),
            Tab::Timeline => list::render_timeline(frame, dashboard, &mut state.timeline, area),
        },
    }
}

/// "refresh in Nm" for the cached project boards. Shows 0m once expired.
pub fn refresh_countdown(info: &CacheInfo) -> String {
    let minutes = if info.is_expired {
        0
    } else {
        info.remaining_ms.div_ceil(60_000)
    };
    format!("refresh in {}m", minutes)
}

fn quota_color(quota: &RateLimitState) -> Color {
    if quota.remaining < 100 {
        Color::Red
    } else if quota.remaining < 500 {
        Color::Yellow
    } else {
        Color::DarkGray
    }
}

/// Draw the status bar with keybinding hints, quota and cache countdown.
fn draw_status_bar(
    frame: &mut Frame,
    refreshing: bool,
    quota: Option<&RateLimitState>,
    cache: Option<&CacheInfo>,
    area: Rect,
) {
    let mut hints = vec![
        Span::raw(" ↑↓ "),
        Span::styled("Navigate", Style::default().fg(Color::DarkGray)),
        Span::raw("  Tab "),
        Span::styled("Switch", Style::default().fg(Color::DarkGray)),
        Span::raw("  r "),
        Span::styled("Reload", Style::default().fg(Color::DarkGray)),
        Span::raw("  R "),
        Span::styled("Refetch", Style::default().fg(Color::DarkGray)),
        Span::raw("  ? "),
        Span::styled("Help", Style::default().fg(Color::DarkGray)),
        Span::raw("  q "),
        Span::styled("Quit", Style::default().fg(Color::DarkGray)),
    ];

    if let Some(quota) = quota {
        hints.push(Span::styled(
            format!("  API: {}/{}", quota.remaining, quota.limit),
            Style::default().fg(quota_color(quota)),
        ));
    }

    if let Some(info) = cache {
        hints.push(Span::styled(
            format!("  {}", refresh_countdown(info)),
            Style::default().fg(Color::DarkGray),
        ));
    }

    if refreshing {
        hints.push(Span::styled("  ⏳", Style::default().fg(Color::Yellow)));
    }

    let status = Paragraph::new(Line::from(hints));
    frame.render_widget(status, area);
}

fn help_line(keys: &'static str, action: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<14}", keys), Style::default().fg(Color::Cyan)),
        Span::raw(action),
    ])
}

/// Draw the help overlay.
fn draw_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    let popup_width = 50.min(area.width);
    let popup_height = 14.min(area.height);
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        help_line("↑/↓ or j/k", "Move selection"),
        help_line("Home/End g/G", "Jump to first/last"),
        help_line("Tab/Shift-Tab", "Switch tabs"),
        help_line("r", "Reload (cached boards)"),
        help_line("R", "Clear cache and reload"),
        help_line("?", "Show/hide this help"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::DarkGray)),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::styled(" or ", Style::default().fg(Color::DarkGray)),
            Span::styled("?", Style::default().fg(Color::Yellow)),
            Span::styled(" to close", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    let help_paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help ")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .alignment(Alignment::Left);

    frame.render_widget(help_paragraph, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn info(remaining_ms: u64, is_expired: bool) -> CacheInfo {
        let now = Utc::now();
        CacheInfo {
            stored_at: now,
            expires_at: now,
            remaining_ms,
            is_expired,
        }
    }

    #[test]
    fn test_refresh_countdown_rounds_up() {
        assert_eq!(refresh_countdown(&info(300_000, false)), "refresh in 5m");
        assert_eq!(refresh_countdown(&info(299_000, false)), "refresh in 5m");
        assert_eq!(refresh_countdown(&info(1_000, false)), "refresh in 1m");
    }

    #[test]
    fn test_refresh_countdown_expired_shows_zero() {
        assert_eq!(refresh_countdown(&info(0, true)), "refresh in 0m");
    }
}
