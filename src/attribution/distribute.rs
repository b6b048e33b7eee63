//! Line distribution: split one file's added/deleted counts across the
//! distinct authors of the commits associated with it.
//!
//! 1. No commits: the whole file goes to [`UNKNOWN_IDENTITY`].
//! 2. Commits are partitioned into pair and non-pair with the classifier.
//! 3. The pair pool is `floor(lines × pair_commits / all_commits)`; the
//!    rest is the non-pair pool.
//! 4. Each pool is divided equally among the distinct primary authors of
//!    its commits (co-authors are not credited). Shares are floored and
//!    the last author in first-seen order absorbs the remainder, so both
//!    pools sum exactly to the file's counts.

use super::classify::{AiEmails, is_pair};
use super::{CommitRecord, FileChange, LineCounts, UNKNOWN_IDENTITY};

/// Lines credited to one contributor for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attribution {
    pub identity: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub lines: LineCounts,
}

/// A distinct author in first-seen order, with the first non-empty
/// name and email observed on their commits.
struct Author {
    identity: String,
    name: Option<String>,
    email: Option<String>,
}

#[derive(Default)]
struct Authors(Vec<Author>);

impl Authors {
    /// Index of the commit's author, registering it on first sight.
    fn slot(&mut self, commit: &CommitRecord) -> usize {
        let identity = commit.identity();
        if let Some(idx) = self.0.iter().position(|a| a.identity == identity) {
            let author = &mut self.0[idx];
            if author.name.is_none() {
                author.name = commit.author_name.clone();
            }
            if author.email.is_none() {
                author.email = commit.author_email.clone();
            }
            return idx;
        }
        self.0.push(Author {
            identity: identity.to_string(),
            name: commit.author_name.clone(),
            email: commit.author_email.clone(),
        });
        self.0.len() - 1
    }
}

/// Split `file` across the authors of `commits`.
///
/// `commits` must already have excluded commits removed. One
/// [`Attribution`] is returned per distinct author, in the order the
/// authors first appear in `commits`; authors whose share floors to zero
/// are still listed.
pub fn distribute_file<'a>(
    file: &FileChange,
    commits: impl IntoIterator<Item = &'a CommitRecord>,
    ai_emails: &AiEmails,
) -> Vec<Attribution> {
    let commits: Vec<&CommitRecord> = commits.into_iter().collect();

    if commits.is_empty() {
        return vec![Attribution {
            identity: UNKNOWN_IDENTITY.to_string(),
            name: None,
            email: None,
            lines: LineCounts {
                additions: file.additions,
                deletions: file.deletions,
                ..Default::default()
            },
        }];
    }

    let mut authors = Authors::default();
    let mut pair_authors: Vec<usize> = Vec::new();
    let mut solo_authors: Vec<usize> = Vec::new();
    let mut pair_commits: u64 = 0;

    for commit in &commits {
        let slot = authors.slot(commit);
        if is_pair(commit.author_email.as_deref(), commit.co_author_emails(), ai_emails) {
            pair_commits += 1;
            push_unique(&mut pair_authors, slot);
        } else {
            push_unique(&mut solo_authors, slot);
        }
    }

    let total_commits = commits.len() as u64;
    let pair_additions = scale(file.additions, pair_commits, total_commits);
    let pair_deletions = scale(file.deletions, pair_commits, total_commits);

    let mut lines = vec![LineCounts::default(); authors.0.len()];

    let shares = split_evenly(pair_additions, pair_authors.len());
    for (&slot, share) in pair_authors.iter().zip(shares) {
        lines[slot].pair_additions += share;
    }
    let shares = split_evenly(pair_deletions, pair_authors.len());
    for (&slot, share) in pair_authors.iter().zip(shares) {
        lines[slot].pair_deletions += share;
    }
    let shares = split_evenly(file.additions - pair_additions, solo_authors.len());
    for (&slot, share) in solo_authors.iter().zip(shares) {
        lines[slot].additions += share;
    }
    let shares = split_evenly(file.deletions - pair_deletions, solo_authors.len());
    for (&slot, share) in solo_authors.iter().zip(shares) {
        lines[slot].deletions += share;
    }

    authors
        .0
        .into_iter()
        .zip(lines)
        .map(|(author, lines)| Attribution {
            identity: author.identity,
            name: author.name,
            email: author.email,
            lines,
        })
        .collect()
}

/// `floor(value × numerator / denominator)` without intermediate overflow.
fn scale(value: u64, numerator: u64, denominator: u64) -> u64 {
    if denominator == 0 {
        return 0;
    }
    (u128::from(value) * u128::from(numerator) / u128::from(denominator)) as u64
}

/// Floor-divide `pool` into `recipients` shares; the last share takes the
/// remainder.
pub fn split_evenly(pool: u64, recipients: usize) -> Vec<u64> {
    if recipients == 0 {
        return Vec::new();
    }
    let n = recipients as u64;
    let share = pool / n;
    let mut shares = vec![share; recipients];
    shares[recipients - 1] = pool - share * (n - 1);
    shares
}

fn push_unique(slots: &mut Vec<usize>, slot: usize) {
    if !slots.contains(&slot) {
        slots.push(slot);
    }
}

#[cfg(test)]
#[path = "distribute_test.rs"]
mod tests;
