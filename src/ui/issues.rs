use chrono::{DateTime, Utc};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::theme::{label_color, Theme};
use crate::types::Issue;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.secondary())
        .title(Span::styled(
            format!(" {} ({}) ", app.feed.filter(), app.feed.issues().len()),
            theme.title(),
        ))
        .style(Style::default().bg(theme.paper));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    if app.feed.issues().is_empty() {
        if !app.feed.is_loading() {
            let message = if app.feed.has_more() {
                "Nothing loaded yet, scroll to retry".to_string()
            } else {
                format!("No {} issues", app.feed.filter().as_api_str())
            };
            frame.render_widget(
                Paragraph::new(message)
                    .style(theme.secondary())
                    .alignment(Alignment::Center),
                chunks[0],
            );
        }
    } else {
        render_list(frame, app, chunks[0]);
    }

    render_footer(frame, app, chunks[1]);
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let width = area.width as usize;

    let items: Vec<ListItem> = app
        .feed
        .issues()
        .iter()
        .enumerate()
        .map(|(i, issue)| issue_item(issue, theme, width, i == app.selected, Utc::now()))
        .collect();

    let list = List::new(items).highlight_style(Style::default().bg(theme.background));

    let mut state = ListState::default()
        .with_offset(app.offset)
        .with_selected(Some(app.selected));

    frame.render_stateful_widget(list, area, &mut state);
}

/// Loading spinner while a page is in flight, end marker once exhausted.
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let line = if app.feed.is_loading() {
        let frame_symbol = SPINNER[app.spinner_frame % SPINNER.len()];
        Line::from(Span::styled(
            format!("{} Loading issues...", frame_symbol),
            Style::default().fg(theme.primary),
        ))
    } else if !app.feed.has_more() && !app.feed.issues().is_empty() {
        Line::from(Span::styled(
            format!("· end of {} issues ·", app.feed.filter().as_api_str()),
            theme.secondary(),
        ))
    } else {
        Line::default()
    };

    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn issue_item(
    issue: &Issue,
    theme: &Theme,
    width: usize,
    selected: bool,
    now: DateTime<Utc>,
) -> ListItem<'static> {
    let title_style = if selected {
        Style::default()
            .fg(theme.primary)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text).add_modifier(Modifier::BOLD)
    };

    let labels_width: usize = issue.labels.iter().map(|l| l.name.chars().count() + 3).sum();
    let title_width = width.saturating_sub(labels_width + 1).max(10);

    let mut first = vec![Span::styled(truncate(&issue.title, title_width), title_style)];
    for label in &issue.labels {
        first.push(Span::raw(" "));
        first.push(Span::styled(
            format!("[{}]", label.name),
            Style::default().fg(label_color(theme, &label.color)),
        ));
    }

    let mut second = Vec::new();
    if issue.is_pull_request {
        second.push(Span::styled("PR ", Style::default().fg(theme.primary)));
    }
    let mut meta = format!("#{} opened by {}", issue.number, issue.author);
    if let Some(created_at) = issue.created_at {
        meta.push_str(&format!(" · {}", format_age(created_at, now)));
    }
    second.push(Span::styled(meta, theme.secondary()));

    ListItem::new(Text::from(vec![Line::from(first), Line::from(second)]))
}

/// Shorten to `max` characters, marking the cut with an ellipsis.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}

fn format_age(dt: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(dt);

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
