use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{IssueFeedError, Result};
use crate::types::IssueState;

/// Which repository the feed tracks and where its API lives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    pub owner: String,
    pub name: String,
    /// REST API root, e.g. `https://api.github.com`
    pub api_base: String,
    /// Filter the first session starts with
    pub initial_state: IssueState,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            owner: "facebook".to_string(),
            name: "react".to_string(),
            api_base: "https://api.github.com".to_string(),
            initial_state: IssueState::Open,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    /// Issues per request. GitHub caps this at 100.
    pub page_size: u8,
    /// Rows from the bottom of the list at which the next page is requested.
    pub scroll_threshold: u16,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            scroll_threshold: 4,
        }
    }
}

/// Palette as `#rrggbb` strings; resolved by `theme::Theme`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub primary: String,
    pub background: String,
    pub paper: String,
    pub text: String,
    pub muted: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            primary: "#58a6ff".to_string(),
            background: "#0d1117".to_string(),
            paper: "#161b22".to_string(),
            text: "#c9d1d9".to_string(),
            muted: "#8b949e".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub repo: RepoConfig,
    #[serde(default)]
    pub paging: PagingConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
}

fn config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("issuefeed").join("config.toml"))
}

impl Config {
    /// Load the user's config file, falling back to defaults when it is
    /// missing or unusable.
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Config::default();
        };

        let Ok(content) = std::fs::read_to_string(&path) else {
            return Config::default();
        };

        match Config::parse(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config file");
                Config::default()
            }
        }
    }

    /// Load an explicitly requested config file. Unlike `load`, failures are errors.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Config::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| IssueFeedError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.repo.owner.is_empty() || self.repo.name.is_empty() {
            return Err(IssueFeedError::Config(
                "repo.owner and repo.name must not be empty".to_string(),
            ));
        }
        if !(1..=100).contains(&self.paging.page_size) {
            return Err(IssueFeedError::Config(format!(
                "paging.page_size must be between 1 and 100, got {}",
                self.paging.page_size
            )));
        }
        Ok(())
    }
}

/// Split `owner/name` into its parts.
pub fn parse_repo_slug(slug: &str) -> Result<(String, String)> {
    let mut parts = slug.trim().trim_end_matches(".git").splitn(2, '/');
    match (parts.next(), parts.next()) {
        (Some(owner), Some(name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((owner.to_string(), name.to_string()))
        }
        _ => Err(IssueFeedError::Config(format!(
            "expected repository as owner/name, got '{}'",
            slug
        ))),
    }
}
