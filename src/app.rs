use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::action::Action;
use crate::config::Config;
use crate::error::Result;
use crate::event::{Event, ScrollDirection};
use crate::feed::{Feed, FetchRequest, PageOutcome};
use crate::scroll::{ScrollListener, ScrollMetrics};
use crate::source::IssueSource;
use crate::theme::Theme;
use crate::types::{Issue, IssueState};
use crate::ui;

/// Terminal rows taken by one issue in the list
pub const ROW_HEIGHT: usize = 2;

pub struct App {
    pub feed: Feed,
    pub repo_name: String,
    pub theme: Theme,

    // List viewport
    pub selected: usize,
    pub offset: usize,
    pub viewport_rows: usize,

    pub spinner_frame: usize,
    pub status: Option<String>,
    pub show_help: bool,
    pub should_quit: bool,
    dirty: bool,
    listener: ScrollListener,
    source: Arc<dyn IssueSource>,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
    in_flight: Option<CancellationToken>,
}

impl App {
    pub fn new(
        config: &Config,
        source: Arc<dyn IssueSource>,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        Self {
            feed: Feed::new(config.repo.initial_state, config.paging.page_size),
            repo_name: format!("{}/{}", config.repo.owner, config.repo.name),
            theme: Theme::from_config(&config.theme),

            selected: 0,
            offset: 0,
            viewport_rows: 0,

            spinner_frame: 0,
            status: None,
            show_help: false,
            should_quit: false,
            dirty: true,
            listener: ScrollListener::new(config.paging.scroll_threshold),
            source,
            action_tx,
            cancel: CancellationToken::new(),
            in_flight: None,
        }
    }

    /// Whether anything visible changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn selected_issue(&self) -> Option<&Issue> {
        self.feed.issues().get(self.selected)
    }

    pub fn visible_items(&self) -> usize {
        (self.viewport_rows / ROW_HEIGHT).max(1)
    }

    pub fn scroll_metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            scroll_top: self.offset * ROW_HEIGHT,
            client_height: self.viewport_rows,
            scroll_height: self.feed.issues().len() * ROW_HEIGHT,
        }
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Init => Action::Start,
            Event::Tick => Action::Tick,
            Event::Key(key) => self.handle_key(key),
            Event::Scroll(ScrollDirection::Down) => Action::ScrollDown,
            Event::Scroll(ScrollDirection::Up) => Action::ScrollUp,
            Event::Resize(width, height) => Action::Resize(width, height),
            Event::Render => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        if self.show_help {
            return match key.code {
                KeyCode::Char('q') | KeyCode::Esc | KeyCode::Char('?') => Action::ToggleHelp,
                _ => Action::None,
            };
        }

        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => Action::Quit,
            (KeyCode::Char('d'), KeyModifiers::CONTROL) | (KeyCode::PageDown, _) => {
                Action::PageDown
            }
            (KeyCode::Char('u'), KeyModifiers::CONTROL) | (KeyCode::PageUp, _) => Action::PageUp,
            (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Action::ScrollDown,
            (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Action::ScrollUp,
            (KeyCode::Char('g'), _) | (KeyCode::Home, _) => Action::GoToTop,
            (KeyCode::Char('G'), _) | (KeyCode::End, _) => Action::GoToBottom,
            (KeyCode::Tab, _)
            | (KeyCode::BackTab, _)
            | (KeyCode::Char('h'), _)
            | (KeyCode::Char('l'), _)
            | (KeyCode::Left, _)
            | (KeyCode::Right, _) => Action::ToggleFilter,
            (KeyCode::Char('o'), _) => Action::SetFilter(IssueState::Open),
            (KeyCode::Char('c'), _) => Action::SetFilter(IssueState::Closed),
            (KeyCode::Char('r'), _) => Action::Refresh,
            (KeyCode::Char('n'), _) => Action::FetchNextPage,
            (KeyCode::Enter, _) => Action::OpenInBrowser,
            (KeyCode::Char('y'), _) => Action::YankUrl,
            (KeyCode::Char('?'), _) => Action::ToggleHelp,
            _ => Action::None,
        }
    }

    pub fn update(&mut self, action: Action) {
        match action {
            Action::None => return,
            Action::Tick if !self.feed.is_loading() => return,
            _ => self.dirty = true,
        }

        if self.status.is_some()
            && !matches!(
                action,
                Action::Tick | Action::PageLoaded { .. } | Action::PageFailed { .. }
            )
        {
            self.status = None;
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
                self.cancel.cancel();
            }
            Action::Tick => {
                self.spinner_frame = self.spinner_frame.wrapping_add(1);
            }
            Action::Resize(_, height) => {
                self.viewport_rows = ui::list_viewport_rows(height);
                self.scroll_to(self.selected);
            }

            Action::ScrollDown => {
                self.scroll_to(self.selected + 1);
                self.on_scroll();
            }
            Action::ScrollUp => {
                self.scroll_to(self.selected.saturating_sub(1));
                self.on_scroll();
            }
            Action::PageDown => {
                self.scroll_to(self.selected + self.visible_items());
                self.on_scroll();
            }
            Action::PageUp => {
                self.scroll_to(self.selected.saturating_sub(self.visible_items()));
                self.on_scroll();
            }
            Action::GoToTop => {
                self.scroll_to(0);
                self.on_scroll();
            }
            Action::GoToBottom => {
                self.scroll_to(usize::MAX);
                self.on_scroll();
            }

            Action::Start | Action::Refresh => {
                let request = self.feed.restart();
                self.reset_viewport();
                if let Some(request) = request {
                    self.spawn_fetch(request);
                }
            }
            Action::FetchNextPage => self.fetch_next_page(),
            Action::SetFilter(filter) => self.set_filter(filter),
            Action::ToggleFilter => self.set_filter(self.feed.filter().toggled()),
            Action::PageLoaded { request, issues } => {
                match self.feed.complete(&request, issues) {
                    PageOutcome::Stale => {
                        tracing::debug!(
                            session = request.session,
                            current = self.feed.session(),
                            page = request.query.page,
                            "discarding page from a previous session"
                        );
                    }
                    PageOutcome::Appended(count) => {
                        tracing::debug!(page = request.query.page, count, "page appended");
                        self.in_flight = None;
                    }
                    PageOutcome::Exhausted => {
                        tracing::info!(
                            filter = %request.query.state,
                            total = self.feed.issues().len(),
                            "reached the end of the issue list"
                        );
                        self.in_flight = None;
                    }
                    PageOutcome::Failed => {}
                }
            }
            Action::PageFailed { request, error } => {
                if self.feed.fail(&request) == PageOutcome::Stale {
                    tracing::debug!(session = request.session, %error, "ignoring failure from a previous session");
                } else {
                    tracing::error!(
                        page = request.query.page,
                        filter = %request.query.state,
                        %error,
                        "Error getting issues"
                    );
                    self.in_flight = None;
                }
            }

            Action::OpenInBrowser => {
                if let Some(url) = self.selected_issue().map(|i| i.url.clone()) {
                    if let Err(e) = open::that(&url) {
                        self.status = Some(format!("Could not open browser: {}", e));
                    }
                }
            }
            Action::YankUrl => {
                if let Some(url) = self.selected_issue().map(|i| i.url.clone()) {
                    self.status = Some(match copy_to_clipboard(&url) {
                        Ok(()) => format!("Copied {}", url),
                        Err(e) => e.to_string(),
                    });
                }
            }
            Action::ToggleHelp => {
                self.show_help = !self.show_help;
            }
            Action::None => {}
        }
    }

    /// Ask for the next page; the feed refuses while loading or exhausted.
    fn fetch_next_page(&mut self) {
        if let Some(request) = self.feed.begin_fetch() {
            self.spawn_fetch(request);
        }
    }

    fn set_filter(&mut self, filter: IssueState) {
        if let Some(request) = self.feed.set_filter(filter) {
            self.reset_viewport();
            self.spawn_fetch(request);
        }
    }

    fn on_scroll(&mut self) {
        let metrics = self.scroll_metrics();
        tracing::trace!(distance = metrics.distance_to_bottom(), "scroll");
        if self.listener.observe(metrics) {
            self.fetch_next_page();
        }
    }

    fn scroll_to(&mut self, index: usize) {
        let len = self.feed.issues().len();
        self.selected = if len == 0 { 0 } else { index.min(len - 1) };

        let visible = self.visible_items();
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + visible {
            self.offset = self.selected + 1 - visible;
        }
    }

    fn reset_viewport(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    /// Run one request in the background. Any request still running belongs
    /// to an older session and is cancelled.
    fn spawn_fetch(&mut self, request: FetchRequest) {
        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
        }

        let token = self.cancel.child_token();
        self.in_flight = Some(token.clone());

        tracing::debug!(
            source = self.source.name(),
            session = request.session,
            page = request.query.page,
            filter = %request.query.state,
            "fetching issues"
        );

        let tx = self.action_tx.clone();
        let source = Arc::clone(&self.source);
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!(session = request.session, page = request.query.page, "fetch cancelled");
                }
                result = source.list_issues(request.query) => {
                    let action = match result {
                        Ok(issues) => Action::PageLoaded { request, issues },
                        Err(e) => Action::PageFailed { request, error: e.to_string() },
                    };
                    tx.send(action).ok();
                }
            }
        });
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(text.to_string())?;
    Ok(())
}
