use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Issue, IssueState};

/// One page request against an issue source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    pub state: IssueState,
    /// 1-based
    pub page: u32,
    pub per_page: u8,
}

/// Anything that can serve pages of issues for a fixed repository.
///
/// An empty page means there is nothing past it.
#[async_trait]
pub trait IssueSource: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    async fn list_issues(&self, query: PageQuery) -> Result<Vec<Issue>>;
}
