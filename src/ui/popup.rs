use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::theme::Theme;

/// Render a centered key reference; any of `q`, `Esc`, `?` closes it.
pub fn render_help(frame: &mut Frame, theme: &Theme, title: &str, entries: &[(&str, &str)]) {
    let key_width = entries.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    let height = (entries.len() + 2) as u16; // +2 for borders
    let area = centered_rect(50, height, frame.area());
    frame.render_widget(Clear, area);

    let lines: Vec<Line> = entries
        .iter()
        .map(|(key, description)| {
            Line::from(vec![
                Span::styled(
                    format!(" {:<key_width$}  ", key),
                    Style::default().fg(theme.primary),
                ),
                Span::styled(description.to_string(), Style::default().fg(theme.text)),
            ])
        })
        .collect();

    let popup = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.primary))
            .style(Style::default().bg(theme.paper))
            .title(Span::styled(format!(" {} ", title), theme.title())),
    );

    frame.render_widget(popup, area);
}

/// Rect of the given size centered in `outer`, clamped to fit
fn centered_rect(width: u16, height: u16, outer: Rect) -> Rect {
    let popup_width = width.min(outer.width);
    let popup_height = height.min(outer.height);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((outer.height.saturating_sub(popup_height)) / 2),
            Constraint::Length(popup_height),
            Constraint::Min(0),
        ])
        .split(outer);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((outer.width.saturating_sub(popup_width)) / 2),
            Constraint::Length(popup_width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}
