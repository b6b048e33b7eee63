//! Wire shapes of the GitHub REST responses we read, and their conversion
//! into attribution inputs. Only the fields used are declared.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::attribution::{CommitRecord, FileChange};

#[derive(Debug, Deserialize)]
pub struct ApiPullRequest {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub html_url: String,
    pub merged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct ApiFile {
    pub filename: String,
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
}

#[derive(Debug, Deserialize)]
pub struct ApiCommit {
    pub sha: String,
    pub commit: ApiCommitDetail,
    /// Linked GitHub account; null when the email maps to no user.
    pub author: Option<ApiUser>,
}

#[derive(Debug, Deserialize)]
pub struct ApiCommitDetail {
    pub author: Option<ApiGitActor>,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiGitActor {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiUser {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub total_count: u64,
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
pub struct SearchItem {
    pub number: u64,
}

/// Pull request metadata shown in reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub merged_at: Option<DateTime<Utc>>,
}

impl From<ApiPullRequest> for PullRequest {
    fn from(pr: ApiPullRequest) -> Self {
        Self {
            number: pr.number,
            title: pr.title,
            url: pr.html_url,
            merged_at: pr.merged_at,
        }
    }
}

impl From<ApiFile> for FileChange {
    fn from(file: ApiFile) -> Self {
        FileChange::new(file.filename, file.additions, file.deletions)
    }
}

impl From<ApiCommit> for CommitRecord {
    fn from(commit: ApiCommit) -> Self {
        let login = commit.author.as_ref().map(|u| u.login.as_str());
        let actor = commit.commit.author.as_ref();
        CommitRecord::new(
            login,
            actor.and_then(|a| a.name.as_deref()),
            actor.and_then(|a| a.email.as_deref()),
            &commit.commit.message,
        )
    }
}

#[cfg(test)]
#[path = "models_test.rs"]
mod tests;
