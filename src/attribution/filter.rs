//! Exclusion rules: commits by message substring, files by glob, and
//! contributors by identity or email.
//!
//! Commit and file exclusion run before attribution. Contributor
//! exclusion runs on the attributed deltas, since a contributor's email is
//! only known once the engine has resolved a distinct author; an excluded
//! contributor's lines are dropped from the totals, not just hidden.

use std::collections::HashSet;
use std::path::Path;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use super::classify::normalize_email;
use super::{ClassificationConfig, CommitRecord};

#[derive(Debug, Clone)]
pub struct ExcludeFilter {
    messages: Vec<String>,
    /// Patterns containing a `/`, matched against the full path.
    paths: GlobSet,
    /// Patterns without a `/`, matched against the file name at any depth.
    names: GlobSet,
    users: HashSet<String>,
    emails: HashSet<String>,
}

impl ExcludeFilter {
    pub fn new(config: &ClassificationConfig) -> Result<Self, globset::Error> {
        let mut paths = GlobSetBuilder::new();
        let mut names = GlobSetBuilder::new();
        for pattern in config.exclude_files.iter().map(|p| p.trim()) {
            if pattern.is_empty() {
                continue;
            }
            let glob = GlobBuilder::new(pattern)
                .literal_separator(true)
                .backslash_escape(true)
                .build()?;
            if pattern.contains('/') {
                paths.add(glob);
            } else {
                names.add(glob);
            }
        }

        Ok(Self {
            messages: config
                .exclude_messages
                .iter()
                .filter(|m| !m.is_empty())
                .cloned()
                .collect(),
            paths: paths.build()?,
            names: names.build()?,
            users: config
                .exclude_users
                .iter()
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty())
                .collect(),
            emails: config
                .exclude_emails
                .iter()
                .map(|e| normalize_email(e))
                .filter(|e| !e.is_empty())
                .collect(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
            && self.paths.is_empty()
            && self.names.is_empty()
            && self.users.is_empty()
            && self.emails.is_empty()
    }

    /// Message contains any excluded substring (case-sensitive).
    pub fn excludes_commit(&self, commit: &CommitRecord) -> bool {
        self.messages
            .iter()
            .any(|pattern| commit.message.contains(pattern.as_str()))
    }

    pub fn excludes_file(&self, path: &str) -> bool {
        let path = path.trim_start_matches("./");
        if self.paths.is_match(path) {
            return true;
        }
        if self.names.is_empty() {
            return false;
        }
        Path::new(path)
            .file_name()
            .is_some_and(|name| self.names.is_match(name))
    }

    pub fn excludes_contributor(&self, identity: &str, email: Option<&str>) -> bool {
        self.users.contains(identity)
            || email.is_some_and(|e| self.emails.contains(&normalize_email(e)))
    }

    /// Commits that survive message exclusion, in their original order.
    pub fn retain_commits<'a>(&self, commits: &'a [CommitRecord]) -> Vec<&'a CommitRecord> {
        commits.iter().filter(|c| !self.excludes_commit(c)).collect()
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
