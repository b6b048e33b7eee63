use std::collections::HashMap;

use super::LineCounts;
use super::distribute::Attribution;

/// Running totals for one contributor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContributorAccumulator {
    pub identity: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub lines: LineCounts,
}

impl ContributorAccumulator {
    fn fill_metadata(&mut self, name: Option<&str>, email: Option<&str>) {
        if self.name.is_none() {
            self.name = name.filter(|n| !n.is_empty()).map(str::to_string);
        }
        if self.email.is_none() {
            self.email = email.filter(|e| !e.is_empty()).map(str::to_string);
        }
    }
}

/// Per-contributor accumulation for a pull request, a repository or a
/// whole run, in first-seen order.
///
/// Counts only ever grow. Name and email are set by the first delta that
/// carries a non-empty value and never overwritten. Merging is not
/// idempotent: each delta must be merged exactly once.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    entries: Vec<ContributorAccumulator>,
    index: HashMap<String, usize>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one file-level delta.
    pub fn merge(&mut self, delta: &Attribution) {
        self.add(
            &delta.identity,
            delta.name.as_deref(),
            delta.email.as_deref(),
            delta.lines,
        );
    }

    /// Fold a finer-grained ledger (one pull request, one repository) into
    /// this one with the same rule as [`Ledger::merge`].
    pub fn absorb(&mut self, other: Ledger) {
        for entry in other.entries {
            self.add(
                &entry.identity,
                entry.name.as_deref(),
                entry.email.as_deref(),
                entry.lines,
            );
        }
    }

    fn add(&mut self, identity: &str, name: Option<&str>, email: Option<&str>, lines: LineCounts) {
        let idx = match self.index.get(identity) {
            Some(&idx) => idx,
            None => {
                self.entries.push(ContributorAccumulator {
                    identity: identity.to_string(),
                    ..Default::default()
                });
                self.index
                    .insert(identity.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        let entry = &mut self.entries[idx];
        entry.lines += lines;
        entry.fill_metadata(name, email);
    }

    #[cfg(test)]
    pub fn get(&self, identity: &str) -> Option<&ContributorAccumulator> {
        self.index.get(identity).map(|&idx| &self.entries[idx])
    }

    /// Contributors in the order they were first merged.
    pub fn iter(&self) -> impl Iterator<Item = &ContributorAccumulator> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all four counters across every contributor.
    pub fn totals(&self) -> LineCounts {
        let mut totals = LineCounts::default();
        for entry in &self.entries {
            totals += entry.lines;
        }
        totals
    }
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
