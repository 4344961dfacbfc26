use crate::feed::FetchRequest;
use crate::types::{Issue, IssueState};

#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,
    Resize(u16, u16),
    Tick,

    // Feed
    Start,
    FetchNextPage,
    SetFilter(IssueState),
    ToggleFilter,
    Refresh,
    PageLoaded {
        request: FetchRequest,
        issues: Vec<Issue>,
    },
    PageFailed {
        request: FetchRequest,
        error: String,
    },

    // Selected issue
    OpenInBrowser,
    YankUrl,

    ToggleHelp,
    None,
}
