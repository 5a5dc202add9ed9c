// Tab bar rendering.
// Shows the organization and per-tab item counts once data is loaded.

use ratatui::{prelude::*, widgets::*};

use crate::app::Tab;
use crate::model::Dashboard;

fn count(tab: Tab, dashboard: &Dashboard) -> usize {
    match tab {
        Tab::Projects => dashboard.projects.len(),
        Tab::Issues => dashboard.issues.len(),
        Tab::Timeline => dashboard.timeline.len(),
    }
}

/// Draw the tab bar at the top of the screen.
pub fn draw_tabs(frame: &mut Frame, active: Tab, org: &str, dashboard: Option<&Dashboard>, area: Rect) {
    let tab_titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|tab| {
            let title = match dashboard {
                Some(d) => format!("{} ({})", tab.title(), count(*tab, d)),
                None => tab.title().to_string(),
            };

            let style = if *tab == active {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            Line::from(Span::styled(title, style))
        })
        .collect();

    let selected_index = Tab::ALL.iter().position(|t| *t == active).unwrap_or(0);

    let tabs_widget = Tabs::new(tab_titles)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(format!(" boardwatch · {} ", org))
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .select(selected_index)
        .highlight_style(Style::default().fg(Color::Yellow))
        .divider(Span::raw(" │ "));

    frame.render_widget(tabs_widget, area);
}
