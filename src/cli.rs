use std::path::PathBuf;

use clap::Parser;

use crate::config::{parse_repo_slug, Config};
use crate::error::Result;
use crate::types::IssueState;

/// Scroll through a GitHub repository's issues in the terminal
#[derive(Debug, Parser)]
#[command(name = "issuefeed", version, about)]
pub struct Cli {
    /// Repository to browse, as owner/name
    #[arg(short, long)]
    pub repo: Option<String>,

    /// Issue state to start with (open or closed)
    #[arg(short, long)]
    pub state: Option<IssueState>,

    /// Config file to use instead of the default location
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Read the config file this invocation points at, then apply flag overrides.
    pub fn load_config(&self) -> Result<Config> {
        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load(),
        };
        self.apply(config)
    }

    pub fn apply(&self, mut config: Config) -> Result<Config> {
        if let Some(slug) = &self.repo {
            let (owner, name) = parse_repo_slug(slug)?;
            config.repo.owner = owner;
            config.repo.name = name;
        }
        if let Some(state) = self.state {
            config.repo.initial_state = state;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let cli =
            Cli::try_parse_from(["issuefeed", "--repo", "rust-lang/rust", "--state", "closed"])
                .unwrap();
        let config = cli.apply(Config::default()).unwrap();

        assert_eq!(config.repo.owner, "rust-lang");
        assert_eq!(config.repo.name, "rust");
        assert_eq!(config.repo.initial_state, IssueState::Closed);
        assert_eq!(config.paging.page_size, 20);
    }

    #[test]
    fn no_flags_keep_config() {
        let cli = Cli::try_parse_from(["issuefeed"]).unwrap();
        let config = cli.apply(Config::default()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn bad_state_is_rejected_by_parser() {
        assert!(Cli::try_parse_from(["issuefeed", "--state", "merged"]).is_err());
    }

    #[test]
    fn bad_repo_is_rejected() {
        let cli = Cli::try_parse_from(["issuefeed", "-r", "react"]).unwrap();
        assert!(cli.apply(Config::default()).is_err());
    }
}
