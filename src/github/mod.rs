//! GitHub REST collaborator: pull request metadata, changed files, commits
//! and the merged pull request search used by date-range runs.
//!
//! Blocking client; list endpoints are paginated 100 items at a time until
//! a short page comes back.

mod models;

pub use models::PullRequest;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::DateTime;
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::attribution::{CommitRecord, FileChange};
use crate::util::DateWindow;
use models::{ApiCommit, ApiFile, ApiPullRequest, SearchResponse};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const PER_PAGE: usize = 100;
/// The search API returns at most this many results per query.
const SEARCH_LIMIT: usize = 1000;
/// Error bodies are cut to this many characters in messages.
const MAX_ERROR_BODY: usize = 300;

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("invalid repository {0:?} (expected OWNER/REPO)")]
    InvalidRepo(String),

    #[error("GitHub token contains characters not allowed in a header")]
    InvalidToken,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub API error ({status}) for {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    #[error("GitHub API rate limit exceeded (resets at {reset})")]
    RateLimited { reset: String },
}

/// `OWNER/REPO` repository coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl FromStr for RepoSlug {
    type Err = GithubError;

    /// Accepts `owner/repo`, optionally as a `https://github.com/` URL or
    /// with a `.git` suffix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GithubError::InvalidRepo(s.to_string());

        let trimmed = s.trim().trim_end_matches('/');
        let trimmed = trimmed
            .strip_prefix("https://github.com/")
            .unwrap_or(trimmed);
        let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);

        let (owner, name) = trimmed.split_once('/').ok_or_else(invalid)?;
        let valid = |part: &str| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        };
        if !valid(owner) || !valid(name) {
            return Err(invalid());
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Everything the pipeline needs from a pull request host.
pub trait PullRequestSource {
    fn pull_request(&self, repo: &RepoSlug, number: u64) -> Result<PullRequest, GithubError>;

    fn pull_request_files(
        &self,
        repo: &RepoSlug,
        number: u64,
    ) -> Result<Vec<FileChange>, GithubError>;

    fn pull_request_commits(
        &self,
        repo: &RepoSlug,
        number: u64,
    ) -> Result<Vec<CommitRecord>, GithubError>;

    /// Numbers of pull requests merged inside `window`, ascending.
    fn merged_pull_requests(
        &self,
        repo: &RepoSlug,
        window: &DateWindow,
    ) -> Result<Vec<u64>, GithubError>;
}

pub struct GithubClient {
    http: Client,
    api_url: String,
}

impl GithubClient {
    pub fn new(api_url: &str, token: Option<&str>) -> Result<Self, GithubError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static(API_VERSION),
        );
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| GithubError::InvalidToken)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = Client::builder()
            .user_agent(concat!("prlines/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, GithubError> {
        debug!(url, ?query, "GET");
        let resp = self.http.get(url).query(query).send()?;
        let resp = check_status(resp, url)?;
        Ok(resp.json()?)
    }

    fn get_pages<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>, GithubError> {
        let mut items = Vec::new();
        for page in 1u32.. {
            let batch: Vec<T> = self.get(
                url,
                &[
                    ("per_page", PER_PAGE.to_string()),
                    ("page", page.to_string()),
                ],
            )?;
            let len = batch.len();
            items.extend(batch);
            if len < PER_PAGE {
                break;
            }
        }
        Ok(items)
    }
}

impl PullRequestSource for GithubClient {
    fn pull_request(&self, repo: &RepoSlug, number: u64) -> Result<PullRequest, GithubError> {
        let url = self.endpoint(&format!("repos/{repo}/pulls/{number}"));
        let pr: ApiPullRequest = self.get(&url, &[])?;
        Ok(pr.into())
    }

    fn pull_request_files(
        &self,
        repo: &RepoSlug,
        number: u64,
    ) -> Result<Vec<FileChange>, GithubError> {
        let url = self.endpoint(&format!("repos/{repo}/pulls/{number}/files"));
        let files: Vec<ApiFile> = self.get_pages(&url)?;
        Ok(files.into_iter().map(FileChange::from).collect())
    }

    fn pull_request_commits(
        &self,
        repo: &RepoSlug,
        number: u64,
    ) -> Result<Vec<CommitRecord>, GithubError> {
        let url = self.endpoint(&format!("repos/{repo}/pulls/{number}/commits"));
        let commits: Vec<ApiCommit> = self.get_pages(&url)?;
        Ok(commits
            .into_iter()
            .map(|c| {
                debug!(sha = %c.sha, "commit");
                CommitRecord::from(c)
            })
            .collect())
    }

    fn merged_pull_requests(
        &self,
        repo: &RepoSlug,
        window: &DateWindow,
    ) -> Result<Vec<u64>, GithubError> {
        let url = self.endpoint("search/issues");
        let q = search_query(repo, window);
        let mut numbers = Vec::new();

        for page in 1u32.. {
            let resp: SearchResponse = self.get(
                &url,
                &[
                    ("q", q.clone()),
                    ("per_page", PER_PAGE.to_string()),
                    ("page", page.to_string()),
                ],
            )?;
            let len = resp.items.len();
            numbers.extend(resp.items.into_iter().map(|item| item.number));

            let total = usize::try_from(resp.total_count).unwrap_or(usize::MAX);
            if len < PER_PAGE || numbers.len() >= total.min(SEARCH_LIMIT) {
                if total > SEARCH_LIMIT {
                    warn!(
                        "{repo}: {total} merged pull requests in {window}, only the first {SEARCH_LIMIT} are analyzed; narrow the date range"
                    );
                }
                break;
            }
        }

        numbers.sort_unstable();
        numbers.dedup();
        Ok(numbers)
    }
}

/// Search query for pull requests of `repo` merged inside `window`.
pub fn search_query(repo: &RepoSlug, window: &DateWindow) -> String {
    format!(
        "repo:{repo} is:pr is:merged merged:{}..{}",
        window.since, window.until
    )
}

fn check_status(resp: Response, url: &str) -> Result<Response, GithubError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    if is_rate_limited(status, resp.headers()) {
        let reset = resp
            .headers()
            .get("x-ratelimit-reset")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<i64>().ok())
            .and_then(|ts| DateTime::from_timestamp(ts, 0))
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "unknown".to_string());
        return Err(GithubError::RateLimited { reset });
    }

    let body: String = resp
        .text()
        .unwrap_or_default()
        .chars()
        .take(MAX_ERROR_BODY)
        .collect();
    Err(GithubError::Status {
        status: status.as_u16(),
        url: url.to_string(),
        body,
    })
}

fn is_rate_limited(status: StatusCode, headers: &HeaderMap) -> bool {
    (status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS)
        && headers
            .get("x-ratelimit-remaining")
            .is_some_and(|v| v.as_bytes() == b"0")
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
