// Centered notice panels.
// Used for the rate-limited screen, which replaces the tab content entirely.

use chrono::{DateTime, Local, Utc};
use ratatui::{prelude::*, widgets::*};

/// Rect of at most `width` x `height`, centered in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

/// Minutes until `reset_at`, rounded up, never negative.
pub fn minutes_until(reset_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let seconds = (reset_at - now).num_seconds().max(0);
    (seconds + 59) / 60
}

/// Draw the "quota exhausted" panel.
pub fn draw_rate_limited(frame: &mut Frame, area: Rect, reset_at: DateTime<Utc>) {
    let panel = centered(area, 56, 9);
    frame.render_widget(Clear, panel);

    let local = reset_at.with_timezone(&Local);
    let lines = vec![
        Line::from(Span::styled(
            "GitHub API rate limit reached",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("Quota resets at "),
            Span::styled(
                local.format("%H:%M:%S").to_string(),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(
                format!(" (in {}m)", minutes_until(reset_at, Utc::now())),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("r", Style::default().fg(Color::Yellow)),
            Span::styled(" retry  ", Style::default().fg(Color::DarkGray)),
            Span::styled("q", Style::default().fg(Color::Yellow)),
            Span::styled(" quit", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    let widget = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(" Rate limited "),
    );
    frame.render_widget(widget, panel);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_minutes_until_rounds_up() {
        let now = Utc::now();
        assert_eq!(minutes_until(now + Duration::seconds(30), now), 1);
        assert_eq!(minutes_until(now + Duration::minutes(10), now), 10);
        assert_eq!(minutes_until(now - Duration::minutes(1), now), 0);
    }

    #[test]
    fn test_centered_fits_small_area() {
        let area = Rect::new(0, 0, 20, 5);
        let rect = centered(area, 56, 9);
        assert_eq!(rect, Rect::new(0, 0, 20, 5));

        let rect = centered(Rect::new(0, 0, 100, 30), 56, 9);
        assert_eq!(rect, Rect::new(22, 10, 56, 9));
    }
}
