use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use super::CommitRecord;

/// Who produced a commit, judged from its author and co-author emails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitKind {
    Human,
    Ai,
    /// At least one AI email and at least one non-AI email.
    Pair,
}

impl CommitKind {
    pub fn label(&self) -> &'static str {
        match self {
            CommitKind::Human => "HUMAN",
            CommitKind::Ai => "AI",
            CommitKind::Pair => "PAIR",
        }
    }
}

/// Email addresses treated as AI contributors. Matching ignores ASCII case.
#[derive(Debug, Clone, Default)]
pub struct AiEmails(HashSet<String>);

impl AiEmails {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            emails
                .into_iter()
                .map(|e| normalize_email(e.as_ref()))
                .filter(|e| !e.is_empty())
                .collect(),
        )
    }

    pub fn contains(&self, email: &str) -> bool {
        self.0.contains(&normalize_email(email))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Classify a commit from its author email and co-author emails.
///
/// Empty emails are dropped and duplicates collapse, so a commit whose
/// author also lists themselves as co-author is still a solo commit.
pub fn classify<'a>(
    author_email: Option<&'a str>,
    co_author_emails: impl IntoIterator<Item = &'a str>,
    ai_emails: &AiEmails,
) -> CommitKind {
    let emails: BTreeSet<String> = author_email
        .into_iter()
        .chain(co_author_emails)
        .map(normalize_email)
        .filter(|e| !e.is_empty())
        .collect();

    let ai = emails.iter().filter(|e| ai_emails.contains(e)).count();
    let human = emails.len() - ai;

    match (ai, human) {
        (0, _) => CommitKind::Human,
        (_, 0) => CommitKind::Ai,
        _ => CommitKind::Pair,
    }
}

/// True when the commit mixes AI and non-AI emails. Fewer than two
/// distinct emails can never pair.
pub fn is_pair<'a>(
    author_email: Option<&'a str>,
    co_author_emails: impl IntoIterator<Item = &'a str>,
    ai_emails: &AiEmails,
) -> bool {
    classify(author_email, co_author_emails, ai_emails) == CommitKind::Pair
}

pub fn classify_commit(commit: &CommitRecord, ai_emails: &AiEmails) -> CommitKind {
    classify(
        commit.author_email.as_deref(),
        commit.co_author_emails(),
        ai_emails,
    )
}

#[cfg(test)]
#[path = "classify_test.rs"]
mod tests;
