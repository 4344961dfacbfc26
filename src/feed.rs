//! Paginated issue feed state.
//!
//! A `Feed` owns the issues accumulated for one filter session together with
//! the page cursor and the `loading` / `has_more` flags. Requests are handed
//! out by `begin_fetch` and must be returned through `complete` or `fail`.
//! Every request carries the session it was issued in; resetting the feed
//! starts a new session, so answers to older requests are dropped.

use crate::source::PageQuery;
use crate::types::{Issue, IssueState};

/// A page request issued by the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub session: u64,
    pub query: PageQuery,
}

/// What applying a response did to the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// Items were appended and the cursor advanced
    Appended(usize),
    /// Empty page, nothing more to load in this session
    Exhausted,
    /// Request failed, state left as it was
    Failed,
    /// Response belongs to an earlier session and was ignored
    Stale,
}

#[derive(Debug, Clone)]
pub struct Feed {
    issues: Vec<Issue>,
    page: u32,
    loading: bool,
    has_more: bool,
    filter: IssueState,
    session: u64,
    page_size: u8,
}

impl Feed {
    pub fn new(filter: IssueState, page_size: u8) -> Self {
        Self {
            issues: Vec::new(),
            page: 1,
            loading: false,
            has_more: true,
            filter,
            session: 0,
            page_size,
        }
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Next page to request
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn filter(&self) -> IssueState {
        self.filter
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    /// Claim the next page. Returns `None` while a request is in flight or
    /// once the source has run dry.
    pub fn begin_fetch(&mut self) -> Option<FetchRequest> {
        if !self.has_more || self.loading {
            return None;
        }

        self.loading = true;
        Some(FetchRequest {
            session: self.session,
            query: PageQuery {
                state: self.filter,
                page: self.page,
                per_page: self.page_size,
            },
        })
    }

    pub fn complete(&mut self, request: &FetchRequest, issues: Vec<Issue>) -> PageOutcome {
        if request.session != self.session {
            return PageOutcome::Stale;
        }

        self.loading = false;
        if issues.is_empty() {
            self.has_more = false;
            return PageOutcome::Exhausted;
        }

        let count = issues.len();
        self.issues.extend(issues);
        self.page += 1;
        PageOutcome::Appended(count)
    }

    pub fn fail(&mut self, request: &FetchRequest) -> PageOutcome {
        if request.session != self.session {
            return PageOutcome::Stale;
        }

        self.loading = false;
        PageOutcome::Failed
    }

    /// Switch to another filter and request its first page.
    /// Choosing the active filter again is not a change and does nothing.
    pub fn set_filter(&mut self, filter: IssueState) -> Option<FetchRequest> {
        if filter == self.filter {
            return None;
        }

        self.filter = filter;
        self.restart()
    }

    /// Drop everything loaded so far and request page 1 again.
    pub fn restart(&mut self) -> Option<FetchRequest> {
        self.issues.clear();
        self.page = 1;
        self.has_more = true;
        self.loading = false;
        self.session += 1;

        tracing::info!(filter = %self.filter, session = self.session, "feed session reset");

        self.begin_fetch()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::Label;

    pub(crate) fn issue(id: u64) -> Issue {
        Issue {
            id,
            number: id,
            title: format!("Issue {}", id),
            author: "octocat".to_string(),
            labels: vec![Label {
                id: 1,
                name: "bug".to_string(),
                color: "d73a4a".to_string(),
            }],
            url: format!("https://github.com/facebook/react/issues/{}", id),
            created_at: None,
            is_pull_request: false,
        }
    }

    pub(crate) fn page_of(start: u64, count: u64) -> Vec<Issue> {
        (start..start + count).map(issue).collect()
    }

    #[test]
    fn new_feed_starts_at_page_one_with_more_to_load() {
        let feed = Feed::new(IssueState::Open, 20);
        assert!(feed.issues().is_empty());
        assert_eq!(feed.page(), 1);
        assert!(feed.has_more());
        assert!(!feed.is_loading());
    }

    #[test]
    fn begin_fetch_marks_loading_and_describes_current_page() {
        let mut feed = Feed::new(IssueState::Open, 20);
        let request = feed.begin_fetch().unwrap();

        assert!(feed.is_loading());
        assert_eq!(request.query.page, 1);
        assert_eq!(request.query.per_page, 20);
        assert_eq!(request.query.state, IssueState::Open);
    }

    #[test]
    fn begin_fetch_while_loading_is_a_no_op() {
        let mut feed = Feed::new(IssueState::Open, 20);
        assert!(feed.begin_fetch().is_some());
        assert!(feed.begin_fetch().is_none());
        assert!(feed.is_loading());
    }

    #[test]
    fn begin_fetch_after_exhaustion_is_a_no_op() {
        let mut feed = Feed::new(IssueState::Open, 20);
        let request = feed.begin_fetch().unwrap();
        feed.complete(&request, Vec::new());

        assert!(feed.begin_fetch().is_none());
        assert!(!feed.is_loading());
    }

    #[test]
    fn non_empty_page_appends_and_advances_cursor() {
        let mut feed = Feed::new(IssueState::Open, 20);
        let request = feed.begin_fetch().unwrap();

        let outcome = feed.complete(&request, page_of(1, 7));

        assert_eq!(outcome, PageOutcome::Appended(7));
        assert_eq!(feed.issues().len(), 7);
        assert_eq!(feed.page(), 2);
        assert!(feed.has_more());
        assert!(!feed.is_loading());
    }

    #[test]
    fn empty_page_ends_session_without_touching_list() {
        let mut feed = Feed::new(IssueState::Open, 20);
        let first = feed.begin_fetch().unwrap();
        feed.complete(&first, page_of(1, 20));

        let second = feed.begin_fetch().unwrap();
        let outcome = feed.complete(&second, Vec::new());

        assert_eq!(outcome, PageOutcome::Exhausted);
        assert_eq!(feed.issues().len(), 20);
        assert_eq!(feed.page(), 2);
        assert!(!feed.has_more());
        assert!(!feed.is_loading());
    }

    #[test]
    fn failure_at_page_three_leaves_state_untouched() {
        let mut feed = Feed::new(IssueState::Open, 20);
        for start in [1, 21] {
            let request = feed.begin_fetch().unwrap();
            feed.complete(&request, page_of(start, 20));
        }
        assert_eq!(feed.page(), 3);

        let request = feed.begin_fetch().unwrap();
        let outcome = feed.fail(&request);

        assert_eq!(outcome, PageOutcome::Failed);
        assert_eq!(feed.issues().len(), 40);
        assert_eq!(feed.page(), 3);
        assert!(feed.has_more());
        assert!(!feed.is_loading());

        // the next scroll retries the same page
        assert_eq!(feed.begin_fetch().unwrap().query.page, 3);
    }

    #[test]
    fn list_only_grows_within_a_session() {
        let mut feed = Feed::new(IssueState::Open, 5);
        let mut previous = 0;
        let pages: [Option<u64>; 5] = [Some(5), None, Some(5), Some(2), Some(0)];

        for (i, page) in pages.iter().enumerate() {
            let request = feed.begin_fetch().unwrap();
            match page {
                Some(n) => {
                    feed.complete(&request, page_of(i as u64 * 10, *n));
                }
                None => {
                    feed.fail(&request);
                }
            }
            assert!(feed.issues().len() >= previous);
            previous = feed.issues().len();
        }
        assert_eq!(previous, 12);
    }

    #[test]
    fn filter_change_resets_and_requests_first_page() {
        let mut feed = Feed::new(IssueState::Open, 20);
        let request = feed.begin_fetch().unwrap();
        feed.complete(&request, page_of(1, 20));
        let request = feed.begin_fetch().unwrap();
        feed.complete(&request, Vec::new());
        assert!(!feed.has_more());

        let request = feed.set_filter(IssueState::Closed).unwrap();

        assert!(feed.issues().is_empty());
        assert_eq!(feed.page(), 1);
        assert!(feed.has_more());
        assert!(feed.is_loading());
        assert_eq!(feed.filter(), IssueState::Closed);
        assert_eq!(request.query.page, 1);
        assert_eq!(request.query.state, IssueState::Closed);
    }

    #[test]
    fn selecting_active_filter_does_nothing() {
        let mut feed = Feed::new(IssueState::Open, 20);
        let request = feed.begin_fetch().unwrap();
        feed.complete(&request, page_of(1, 3));
        let session = feed.session();

        assert!(feed.set_filter(IssueState::Open).is_none());
        assert_eq!(feed.issues().len(), 3);
        assert_eq!(feed.session(), session);
    }

    #[test]
    fn filter_change_while_loading_issues_a_fresh_request() {
        let mut feed = Feed::new(IssueState::Open, 20);
        let stale = feed.begin_fetch().unwrap();

        let fresh = feed.set_filter(IssueState::Closed).unwrap();

        assert_ne!(stale.session, fresh.session);
        assert!(feed.is_loading());
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut feed = Feed::new(IssueState::Open, 20);
        let stale = feed.begin_fetch().unwrap();
        let fresh = feed.set_filter(IssueState::Closed).unwrap();

        assert_eq!(feed.complete(&stale, page_of(1, 20)), PageOutcome::Stale);
        assert!(feed.issues().is_empty());
        assert!(feed.is_loading());

        assert_eq!(feed.fail(&stale), PageOutcome::Stale);
        assert!(feed.is_loading());

        assert_eq!(feed.complete(&fresh, page_of(100, 4)), PageOutcome::Appended(4));
        assert_eq!(feed.issues()[0].id, 100);
        assert_eq!(feed.page(), 2);
    }

    #[test]
    fn restart_keeps_filter_and_bumps_session() {
        let mut feed = Feed::new(IssueState::Closed, 20);
        let request = feed.begin_fetch().unwrap();
        feed.complete(&request, page_of(1, 20));

        let request = feed.restart().unwrap();

        assert_eq!(feed.filter(), IssueState::Closed);
        assert_eq!(request.session, 1);
        assert_eq!(request.query.page, 1);
        assert!(feed.issues().is_empty());
    }
}
