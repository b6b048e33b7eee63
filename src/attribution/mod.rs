//! Attribution engine: per-contributor line counts for pull requests.
//!
//! GitHub only exposes aggregate added/deleted counts per file plus the
//! list of commits, so there is no per-line authorship to read. Each
//! file's counts are split evenly across the distinct authors of the
//! commits that touched it. Commits pairing a human with an AI co-author
//! (via `Co-authored-by:` trailers) feed a separate "pair" pool whose
//! size is proportional to the share of pair commits.
//!
//! Pipeline: [`filter`] drops commits and files, [`distribute`] splits a
//! file across authors, [`ledger`] accumulates the deltas for the whole
//! run, and [`summary`] turns the ledger into sorted records, buckets and
//! percentages.

pub mod classify;
pub mod coauthor;
pub mod distribute;
pub mod filter;
pub mod ledger;
pub mod summary;

use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use classify::AiEmails;
use filter::ExcludeFilter;

/// Identity used when a file has no commits or an author cannot be resolved.
pub const UNKNOWN_IDENTITY: &str = "Unknown";

/// Added/deleted line counts for one file of a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: String,
    pub additions: u64,
    pub deletions: u64,
}

impl FileChange {
    pub fn new(path: impl Into<String>, additions: u64, deletions: u64) -> Self {
        Self {
            path: path.into(),
            additions,
            deletions,
        }
    }
}

/// A co-author declared by a commit trailer. Either field may be missing
/// when the record comes from a source other than the trailer parser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoAuthor {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// One commit of a pull request, reduced to what attribution needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// Login when known, else the raw author name, else [`UNKNOWN_IDENTITY`].
    pub author_identity: String,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
    pub co_authors: Vec<CoAuthor>,
    pub message: String,
}

impl CommitRecord {
    /// Build a record from raw commit metadata, parsing co-authors out of
    /// the message trailers.
    pub fn new(
        login: Option<&str>,
        name: Option<&str>,
        email: Option<&str>,
        message: &str,
    ) -> Self {
        let login = non_empty(login);
        let author_name = non_empty(name);
        let author_identity = login
            .or_else(|| author_name.clone())
            .unwrap_or_else(|| UNKNOWN_IDENTITY.to_string());

        Self {
            author_identity,
            author_name,
            author_email: non_empty(email),
            co_authors: coauthor::extract(message),
            message: message.to_string(),
        }
    }

    /// The identity lines are credited to; never empty.
    pub fn identity(&self) -> &str {
        let id = self.author_identity.trim();
        if id.is_empty() { UNKNOWN_IDENTITY } else { id }
    }

    /// Emails of the co-authors, skipping entries without one.
    pub fn co_author_emails(&self) -> impl Iterator<Item = &str> {
        self.co_authors.iter().filter_map(|c| c.email.as_deref())
    }
}

/// The four counters tracked per contributor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LineCounts {
    pub additions: u64,
    pub deletions: u64,
    pub pair_additions: u64,
    pub pair_deletions: u64,
}

impl LineCounts {
    pub fn total(&self) -> u64 {
        self.solo() + self.pair()
    }

    pub fn solo(&self) -> u64 {
        self.additions + self.deletions
    }

    pub fn pair(&self) -> u64 {
        self.pair_additions + self.pair_deletions
    }
}

impl AddAssign for LineCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.additions += rhs.additions;
        self.deletions += rhs.deletions;
        self.pair_additions += rhs.pair_additions;
        self.pair_deletions += rhs.pair_deletions;
    }
}

/// Classification inputs for a run. Doubles as the `[attribution]` table
/// of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Emails whose commits count as AI-authored.
    pub ai_emails: Vec<String>,
    /// Contributor identities (logins or names) dropped from the results.
    pub exclude_users: Vec<String>,
    /// Contributor emails dropped from the results.
    pub exclude_emails: Vec<String>,
    /// Shell globs (`**`, `*`, `{a,b}`) of file paths to ignore.
    pub exclude_files: Vec<String>,
    /// Literal substrings; commits whose message contains one are ignored.
    pub exclude_messages: Vec<String>,
}

impl ClassificationConfig {
    /// Union `other` into `self`, keeping first-seen order and skipping
    /// duplicates and blank entries.
    pub fn extend(&mut self, other: ClassificationConfig) {
        union_into(&mut self.ai_emails, other.ai_emails);
        union_into(&mut self.exclude_users, other.exclude_users);
        union_into(&mut self.exclude_emails, other.exclude_emails);
        union_into(&mut self.exclude_files, other.exclude_files);
        union_into(&mut self.exclude_messages, other.exclude_messages);
    }
}

fn union_into(target: &mut Vec<String>, extra: Vec<String>) {
    for value in extra {
        let value = value.trim().to_string();
        if !value.is_empty() && !target.contains(&value) {
            target.push(value);
        }
    }
}

/// Compiled form of [`ClassificationConfig`], read-only during attribution.
#[derive(Debug, Clone)]
pub struct Rules {
    pub ai_emails: AiEmails,
    pub exclude: ExcludeFilter,
}

impl Rules {
    pub fn from_config(config: &ClassificationConfig) -> Result<Self, globset::Error> {
        Ok(Self {
            ai_emails: AiEmails::new(&config.ai_emails),
            exclude: ExcludeFilter::new(config)?,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
