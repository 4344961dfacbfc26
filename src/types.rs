use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// GitHub issue as shown in the feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub author: String,
    pub labels: Vec<Label>,
    pub url: String,
    pub created_at: Option<DateTime<Utc>>,
    pub is_pull_request: bool,
}

/// Colored tag attached to an issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub id: u64,
    pub name: String,
    /// Six hex digits, no leading `#`
    pub color: String,
}

/// Which partition of issues the feed shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    #[default]
    Open,
    Closed,
}

impl IssueState {
    pub fn as_api_str(&self) -> &'static str {
        match self {
            IssueState::Open => "open",
            IssueState::Closed => "closed",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            IssueState::Open => IssueState::Closed,
            IssueState::Closed => IssueState::Open,
        }
    }
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueState::Open => write!(f, "Open"),
            IssueState::Closed => write!(f, "Closed"),
        }
    }
}

impl FromStr for IssueState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "open" => Ok(IssueState::Open),
            "closed" => Ok(IssueState::Closed),
            other => Err(format!("unknown issue state '{}' (expected open or closed)", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_parses_case_insensitively() {
        assert_eq!("Open".parse::<IssueState>(), Ok(IssueState::Open));
        assert_eq!("CLOSED".parse::<IssueState>(), Ok(IssueState::Closed));
        assert!("all".parse::<IssueState>().is_err());
    }

    #[test]
    fn toggled_flips_between_partitions() {
        assert_eq!(IssueState::Open.toggled(), IssueState::Closed);
        assert_eq!(IssueState::Closed.toggled(), IssueState::Open);
    }

    #[test]
    fn api_str_matches_query_values() {
        assert_eq!(IssueState::Open.as_api_str(), "open");
        assert_eq!(IssueState::Closed.as_api_str(), "closed");
    }
}
