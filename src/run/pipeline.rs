//! Fetch, filter, distribute and aggregate.
//!
//! Every pull request is fetched completely (metadata, commits, files)
//! before anything is attributed, so a failure half way through leaves
//! no partial deltas behind. A pull request ledger is absorbed into its
//! repository ledger, which is absorbed into the run ledger.

use std::ops::AddAssign;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::{AttributionReport, Scope};
use crate::attribution::classify::{AiEmails, CommitKind, classify_commit};
use crate::attribution::distribute::distribute_file;
use crate::attribution::ledger::Ledger;
use crate::attribution::{CommitRecord, FileChange, Rules};
use crate::git::RangeChanges;
use crate::github::{GithubError, PullRequest, PullRequestSource, RepoSlug};
use crate::util::DateWindow;

/// How the commits of a run were classified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CommitTally {
    pub human: u64,
    pub ai: u64,
    pub pair: u64,
    /// Dropped by a message exclusion pattern.
    pub excluded: u64,
}

impl CommitTally {
    fn record(&mut self, commit: &CommitRecord, ai_emails: &AiEmails) {
        let kind = classify_commit(commit, ai_emails);
        if kind == CommitKind::Pair {
            let partners: Vec<&str> = commit
                .co_authors
                .iter()
                .filter_map(|c| c.name.as_deref())
                .collect();
            debug!("{} paired with {}", commit.identity(), partners.join(", "));
        } else {
            debug!(identity = commit.identity(), kind = kind.label(), "commit");
        }
        match kind {
            CommitKind::Human => self.human += 1,
            CommitKind::Ai => self.ai += 1,
            CommitKind::Pair => self.pair += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.human + self.ai + self.pair + self.excluded
    }
}

impl AddAssign for CommitTally {
    fn add_assign(&mut self, rhs: Self) {
        self.human += rhs.human;
        self.ai += rhs.ai;
        self.pair += rhs.pair;
        self.excluded += rhs.excluded;
    }
}

/// A pull request or repository left out of the results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skipped {
    pub repository: String,
    /// `None` when the whole repository was skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<u64>,
    pub reason: String,
}

impl Skipped {
    fn pull_request(repo: &RepoSlug, number: u64, err: &GithubError) -> Self {
        warn!("skipping {repo}#{number}: {err}");
        Self {
            repository: repo.to_string(),
            pull_request: Some(number),
            reason: err.to_string(),
        }
    }

    fn repository(repo: &RepoSlug, err: &GithubError) -> Self {
        warn!("skipping {repo}: {err}");
        Self {
            repository: repo.to_string(),
            pull_request: None,
            reason: err.to_string(),
        }
    }
}

/// Attribute one pull request. GitHub does not say which commits touched
/// which file, so every file is split across all surviving commits.
pub fn attribute_pull_request(
    files: &[FileChange],
    commits: &[CommitRecord],
    rules: &Rules,
) -> (Ledger, CommitTally) {
    let kept = rules.exclude.retain_commits(commits);

    let mut tally = CommitTally {
        excluded: (commits.len() - kept.len()) as u64,
        ..Default::default()
    };
    for commit in &kept {
        tally.record(commit, &rules.ai_emails);
    }

    let mut ledger = Ledger::new();
    for file in files {
        if rules.exclude.excludes_file(&file.path) {
            debug!(path = %file.path, "excluded file");
            continue;
        }
        merge_file(&mut ledger, file, kept.iter().copied(), rules);
    }
    (ledger, tally)
}

/// Attribute a local range, where each file is split across only the
/// commits that touched it.
pub fn attribute_range(changes: &RangeChanges, rules: &Rules) -> (Ledger, CommitTally) {
    let kept: Vec<bool> = changes
        .commits
        .iter()
        .map(|c| !rules.exclude.excludes_commit(c))
        .collect();

    let mut tally = CommitTally::default();
    for (commit, &is_kept) in changes.commits.iter().zip(&kept) {
        if is_kept {
            tally.record(commit, &rules.ai_emails);
        } else {
            tally.excluded += 1;
        }
    }

    let mut ledger = Ledger::new();
    for file in &changes.files {
        if rules.exclude.excludes_file(&file.path) {
            debug!(path = %file.path, "excluded file");
            continue;
        }
        let touching = changes
            .touched
            .get(&file.path)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .filter(|&&i| kept.get(i).copied().unwrap_or(false))
            .filter_map(|&i| changes.commits.get(i));
        merge_file(&mut ledger, file, touching, rules);
    }
    (ledger, tally)
}

/// Distribute one file and merge the deltas of non-excluded contributors.
fn merge_file<'a>(
    ledger: &mut Ledger,
    file: &FileChange,
    commits: impl IntoIterator<Item = &'a CommitRecord>,
    rules: &Rules,
) {
    for delta in distribute_file(file, commits, &rules.ai_emails) {
        if rules
            .exclude
            .excludes_contributor(&delta.identity, delta.email.as_deref())
        {
            debug!(identity = %delta.identity, path = %file.path, "excluded contributor");
            continue;
        }
        ledger.merge(&delta);
    }
}

struct Fetched {
    pull_request: PullRequest,
    files: Vec<FileChange>,
    commits: Vec<CommitRecord>,
}

fn fetch(
    source: &impl PullRequestSource,
    repo: &RepoSlug,
    number: u64,
) -> Result<Fetched, GithubError> {
    let pull_request = source.pull_request(repo, number)?;
    let commits = source.pull_request_commits(repo, number)?;
    let files = source.pull_request_files(repo, number)?;
    info!(
        "{repo}#{number}: {} files, {} commits",
        files.len(),
        commits.len()
    );
    Ok(Fetched {
        pull_request,
        files,
        commits,
    })
}

/// Accumulated state of a run over several pull requests.
#[derive(Default)]
struct RunState {
    ledger: Ledger,
    tally: CommitTally,
    skipped: Vec<Skipped>,
    analyzed: Vec<u64>,
}

impl RunState {
    /// Attribute every pull request of `numbers` into a repository ledger,
    /// then absorb it into the run.
    fn add_repository(
        &mut self,
        source: &impl PullRequestSource,
        repo: &RepoSlug,
        numbers: &[u64],
        rules: &Rules,
    ) {
        let mut repo_ledger = Ledger::new();
        for &number in numbers {
            match fetch(source, repo, number) {
                Ok(fetched) => {
                    let (pr_ledger, tally) =
                        attribute_pull_request(&fetched.files, &fetched.commits, rules);
                    repo_ledger.absorb(pr_ledger);
                    self.tally += tally;
                    self.analyzed.push(number);
                }
                Err(err) => self.skipped.push(Skipped::pull_request(repo, number, &err)),
            }
        }
        if repo_ledger.is_empty() {
            info!("{repo}: no lines attributed");
        } else {
            info!("{repo}: {} contributors", repo_ledger.len());
        }
        self.ledger.absorb(repo_ledger);
    }
}

/// A single pull request. Fetch failures are returned, not skipped.
pub fn single_pr(
    source: &impl PullRequestSource,
    repo: &RepoSlug,
    number: u64,
    rules: &Rules,
) -> Result<AttributionReport, GithubError> {
    let fetched = fetch(source, repo, number)?;
    let (ledger, tally) = attribute_pull_request(&fetched.files, &fetched.commits, rules);

    let pr = fetched.pull_request;
    let scope = Scope::SinglePr {
        repository: repo.to_string(),
        number: pr.number,
        title: pr.title,
        url: pr.url,
        merged_at: pr.merged_at,
    };
    Ok(AttributionReport::new(scope, &ledger, tally, Vec::new(), rules))
}

/// An explicit list of pull requests of one repository; failing ones are
/// skipped.
pub fn pr_list(
    source: &impl PullRequestSource,
    repo: &RepoSlug,
    numbers: &[u64],
    rules: &Rules,
) -> AttributionReport {
    let mut state = RunState::default();
    state.add_repository(source, repo, numbers, rules);

    let scope = Scope::PrList {
        repository: repo.to_string(),
        requested: numbers.to_vec(),
        analyzed: state.analyzed,
    };
    AttributionReport::new(scope, &state.ledger, state.tally, state.skipped, rules)
}

/// Pull requests merged inside `window` across `repos`. A repository whose
/// search fails is skipped as a whole.
pub fn date_range(
    source: &impl PullRequestSource,
    repos: &[RepoSlug],
    window: &DateWindow,
    rules: &Rules,
) -> AttributionReport {
    let mut state = RunState::default();

    for repo in repos {
        let numbers = match source.merged_pull_requests(repo, window) {
            Ok(numbers) => numbers,
            Err(err) => {
                state.skipped.push(Skipped::repository(repo, &err));
                continue;
            }
        };
        info!("{repo}: {} pull requests merged in {window}", numbers.len());
        state.add_repository(source, repo, &numbers, rules);
    }

    let scope = Scope::DateRange {
        repositories: repos.iter().map(RepoSlug::to_string).collect(),
        since: window.since,
        until: window.until,
        pull_requests: state.analyzed.len(),
    };
    AttributionReport::new(scope, &state.ledger, state.tally, state.skipped, rules)
}

/// A local `A..B` range read from a git repository.
pub fn local_range(
    changes: &RangeChanges,
    path: &str,
    range: &str,
    rules: &Rules,
) -> AttributionReport {
    let (ledger, tally) = attribute_range(changes, rules);
    let scope = Scope::LocalRange {
        path: path.to_string(),
        range: range.to_string(),
        commits: changes.commits.len(),
    };
    AttributionReport::new(scope, &ledger, tally, Vec::new(), rules)
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
