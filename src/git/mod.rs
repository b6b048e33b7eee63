//! Local repository access for attributing a branch before it becomes a
//! pull request.
//!
//! A range `A..B` is read the way GitHub presents a pull request: file
//! stats come from diffing `merge_base(A, B)` against `B`, and the commits
//! are those reachable from `B` but not from `A`, oldest first, merges
//! skipped.

use std::collections::HashMap;
use std::error::Error;
use std::path::Path;

use git2::{Commit, DiffOptions, Oid, Patch, Repository, Sort};
use tracing::debug;

use crate::attribution::{CommitRecord, FileChange};

pub const DEFAULT_RANGE: &str = "origin/main..HEAD";

pub struct GitRepo {
    repo: Repository,
}

/// Everything attribution needs from a local range.
#[derive(Debug, Default)]
pub struct RangeChanges {
    pub files: Vec<FileChange>,
    /// Non-merge commits, oldest first.
    pub commits: Vec<CommitRecord>,
    /// Path to the indices in `commits` of the commits that changed it.
    pub touched: HashMap<String, Vec<usize>>,
}

impl GitRepo {
    pub fn open(path: &Path) -> Result<Self, Box<dyn Error>> {
        let repo = Repository::discover(path)?;
        Ok(Self { repo })
    }

    pub fn range_changes(&self, range: &str) -> Result<RangeChanges, Box<dyn Error>> {
        let (from, to) = self.resolve_range(range)?;
        let base = self.repo.merge_base(from, to)?;

        let mut changes = RangeChanges {
            files: self.diff_stats(base, to)?,
            ..Default::default()
        };

        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(to)?;
        revwalk.hide(from)?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)?;

        for oid in revwalk {
            let oid = oid?;
            let commit = self.repo.find_commit(oid)?;

            // Skip merge commits
            if commit.parent_count() > 1 {
                debug!(%oid, "skipping merge commit");
                continue;
            }

            let idx = changes.commits.len();
            for path in self.changed_files(&commit)? {
                changes.touched.entry(path).or_default().push(idx);
            }
            changes.commits.push(commit_record(&commit));
        }

        Ok(changes)
    }

    /// Resolve `A..B` (an empty `B` means `HEAD`) to commit ids.
    fn resolve_range(&self, range: &str) -> Result<(Oid, Oid), Box<dyn Error>> {
        let (from, to) = range
            .split_once("..")
            .ok_or_else(|| format!("invalid range {range:?} (expected A..B)"))?;
        if to.starts_with('.') {
            return Err(format!("symmetric ranges are not supported: {range:?}").into());
        }
        if from.is_empty() {
            return Err(format!("range {range:?} has no start").into());
        }
        let to = if to.is_empty() { "HEAD" } else { to };

        Ok((self.resolve_commit(from)?, self.resolve_commit(to)?))
    }

    fn resolve_commit(&self, spec: &str) -> Result<Oid, Box<dyn Error>> {
        let commit = self
            .repo
            .revparse_single(spec)
            .and_then(|obj| obj.peel_to_commit())
            .map_err(|e| format!("unknown revision {spec:?}: {}", e.message()))?;
        Ok(commit.id())
    }

    /// Per-file added/deleted lines between two commits. Binary files are
    /// left out.
    fn diff_stats(&self, base: Oid, head: Oid) -> Result<Vec<FileChange>, Box<dyn Error>> {
        let old_tree = self.repo.find_commit(base)?.tree()?;
        let new_tree = self.repo.find_commit(head)?.tree()?;

        let mut opts = DiffOptions::new();
        let diff = self
            .repo
            .diff_tree_to_tree(Some(&old_tree), Some(&new_tree), Some(&mut opts))?;

        let mut files = Vec::new();
        for idx in 0..diff.deltas().len() {
            let Some(patch) = Patch::from_diff(&diff, idx)? else {
                continue;
            };
            let delta = patch.delta();
            let Some(path) = delta.new_file().path().or_else(|| delta.old_file().path())
            else {
                continue;
            };
            if delta.flags().is_binary() {
                debug!(path = %path.display(), "skipping binary file");
                continue;
            }
            let (_, additions, deletions) = patch.line_stats()?;
            files.push(FileChange::new(
                path.to_string_lossy(),
                additions as u64,
                deletions as u64,
            ));
        }
        Ok(files)
    }

    fn changed_files(&self, commit: &Commit) -> Result<Vec<String>, Box<dyn Error>> {
        let tree = commit.tree()?;
        let parent_tree = if commit.parent_count() > 0 {
            Some(commit.parent(0)?.tree()?)
        } else {
            None
        };

        let mut opts = DiffOptions::new();
        let diff =
            self.repo
                .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut opts))?;

        Ok(diff
            .deltas()
            .filter_map(|delta| delta.new_file().path().or_else(|| delta.old_file().path()))
            .map(|p| p.to_string_lossy().into_owned())
            .collect())
    }
}

/// Local commits carry no account login, so the author name is the
/// identity.
fn commit_record(commit: &Commit) -> CommitRecord {
    let author = commit.author();
    CommitRecord::new(
        None,
        author.name(),
        author.email(),
        commit.message().unwrap_or_default(),
    )
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
