mod issues;
mod popup;

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::types::IssueState;

/// Rows around the issue list: header block, status bar, list borders, list footer
pub const CHROME_ROWS: u16 = 3 + 1 + 2 + 1;

/// Height of the scrollable list for a terminal of the given height.
pub fn list_viewport_rows(terminal_height: u16) -> usize {
    terminal_height.saturating_sub(CHROME_ROWS) as usize
}

pub const HELP: &[(&str, &str)] = &[
    ("j/k, wheel", "move selection"),
    ("Ctrl+d/u", "page down/up"),
    ("g/G", "top/bottom"),
    ("Tab, h/l", "toggle open/closed"),
    ("o / c", "show open / closed"),
    ("Enter", "open issue in browser"),
    ("y", "copy issue URL"),
    ("n", "load next page"),
    ("r", "reload"),
    ("?", "this help"),
    ("q", "quit"),
];

pub fn render(frame: &mut Frame, app: &App) {
    frame.render_widget(
        Block::default().style(Style::default().bg(app.theme.background)),
        frame.area(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    issues::render(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    if app.show_help {
        popup::render_help(frame, &app.theme, "Keys", HELP);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.secondary())
        .style(Style::default().bg(theme.paper));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let toggle = filter_toggle(app);
    let toggle_width = toggle.width() as u16;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(toggle_width)])
        .split(inner);

    let title = Paragraph::new(Line::from(Span::styled(
        format!("{} Issues", app.repo_name),
        theme.title(),
    )));
    frame.render_widget(title, chunks[0]);
    frame.render_widget(
        Paragraph::new(toggle).alignment(Alignment::Right),
        chunks[1],
    );
}

/// Two-way exclusive toggle; the active filter is filled in.
fn filter_toggle(app: &App) -> Line<'static> {
    let theme = &app.theme;
    let active = app.feed.filter();

    let button = |state: IssueState| {
        let style = if state == active {
            Style::default()
                .fg(theme.background)
                .bg(theme.primary)
                .add_modifier(Modifier::BOLD)
        } else {
            theme.secondary()
        };
        Span::styled(format!(" {} ", state), style)
    };

    Line::from(vec![
        button(IssueState::Open),
        Span::styled("│", theme.secondary()),
        button(IssueState::Closed),
    ])
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let status = if let Some(message) = &app.status {
        Line::from(Span::styled(message.clone(), Style::default().fg(theme.primary)))
    } else {
        Line::from(Span::styled(
            "j/k: nav | Tab: open/closed | Enter: open | y: copy url | r: reload | ?: help | q: quit",
            theme.secondary(),
        ))
    };

    let status_bar = Paragraph::new(status).style(Style::default().bg(theme.paper));
    frame.render_widget(status_bar, area);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use tokio::sync::mpsc;

    use super::*;
    use crate::action::Action;
    use crate::config::Config;
    use crate::error::Result;
    use crate::feed::tests::page_of;
    use crate::source::{IssueSource, PageQuery};
    use crate::types::Issue;

    #[derive(Debug)]
    struct NoSource;

    #[async_trait]
    impl IssueSource for NoSource {
        fn name(&self) -> &str {
            "none"
        }

        async fn list_issues(&self, _query: PageQuery) -> Result<Vec<Issue>> {
            Ok(Vec::new())
        }
    }

    fn app() -> App {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(&Config::default(), Arc::new(NoSource), tx);
        app.update(Action::Resize(100, 24));
        app
    }

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn viewport_excludes_chrome() {
        assert_eq!(list_viewport_rows(24), 17);
        assert_eq!(list_viewport_rows(3), 0);
    }

    #[test]
    fn renders_header_toggle_and_rows() {
        let mut app = app();
        let request = app.feed.begin_fetch().unwrap();
        app.feed.complete(&request, page_of(1, 3));

        let screen = draw(&app);

        assert!(screen.contains("facebook/react Issues"));
        assert!(screen.contains(" Open "));
        assert!(screen.contains(" Closed "));
        assert!(screen.contains("Issue 2"));
        assert!(screen.contains("#3 opened by octocat"));
        assert!(screen.contains("bug"));
        assert!(!screen.contains("Loading"));
    }

    #[test]
    fn loading_indicator_only_while_loading() {
        let mut app = app();
        let request = app.feed.begin_fetch().unwrap();
        assert!(draw(&app).contains("Loading issues"));

        app.feed.complete(&request, Vec::new());
        let screen = draw(&app);
        assert!(!screen.contains("Loading issues"));
        assert!(screen.contains("No open issues"));
    }

    #[test]
    fn help_overlay_lists_keys() {
        let mut app = app();
        app.update(Action::ToggleHelp);
        let screen = draw(&app);
        assert!(screen.contains("open issue in browser"));
    }
}
