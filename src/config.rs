//! Configuration file loading.
//!
//! Optional TOML at `~/.config/prlines/config.toml`:
//!
//! ```toml
//! [github]
//! api_url = "https://api.github.com"
//! token = "ghp_..."
//!
//! [attribution]
//! ai_emails = ["noreply@anthropic.com"]
//! exclude_users = ["dependabot[bot]"]
//! exclude_files = ["**/*.lock"]
//! ```

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::attribution::ClassificationConfig;
use crate::github::DEFAULT_API_URL;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub github: GithubConfig,
    pub attribution: ClassificationConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// REST base URL; override for GitHub Enterprise.
    pub api_url: String,
    pub token: Option<String>,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
        }
    }
}

pub fn default_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("prlines")
        .join("config.toml")
}

/// Load the config file.
///
/// With an explicit `path` the file must exist. Without one the default
/// path is tried and a missing file yields defaults.
pub fn load(path: Option<&Path>) -> Result<Config, Box<dyn Error>> {
    let (path, explicit) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (default_path(), false),
    };

    if !path.exists() {
        if explicit {
            return Err(format!("config file not found: {}", path.display()).into());
        }
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| format!("cannot read config file {}: {e}", path.display()))?;
    parse(&content).map_err(|e| format!("invalid config file {}: {e}", path.display()).into())
}

pub fn parse(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(content)
}

impl Config {
    /// Token from `GITHUB_TOKEN`, then `GH_TOKEN`, then the config file.
    pub fn resolve_token(&self) -> Option<String> {
        self.resolve_token_with(|key| std::env::var(key).ok())
    }

    pub fn resolve_token_with<F>(&self, env: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        ["GITHUB_TOKEN", "GH_TOKEN"]
            .into_iter()
            .filter_map(|key| env(key))
            .chain(self.github.token.clone())
            .map(|t| t.trim().to_string())
            .find(|t| !t.is_empty())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
