//! Long help text constants for CLI subcommands.
//!
//! Extracted from `cli.rs` to keep the argument definitions concise.

/// How lines are attributed; shared by every analysis command.
macro_rules! attribution_notes {
    () => {
        "
How lines are attributed:
  GitHub reports only added/deleted counts per file, so each file's lines
  are split evenly across the distinct authors of the pull request's
  commits (the last author in commit order takes the rounding remainder).
  Commits by a human with an AI co-author (Co-authored-by trailer with an
  email listed in --ai-email) form a pair pool credited to their authors.

Configuration:
  ~/.config/prlines/config.toml ([github] and [attribution] tables).
  CLI lists are added to the config file lists.
  Token: GITHUB_TOKEN, then GH_TOKEN, then [github] token."
    };
}

/// Single pull request.
pub const PR: &str = concat!(
    "\
Attribute the changed lines of one pull request to its contributors.

Examples:
  prl pr rust-lang/cargo 12345
  prl pr acme/api 42 --ai-email noreply@anthropic.com
  prl pr acme/api 42 --exclude-file '**/*.lock' --json
",
    attribution_notes!()
);

/// Explicit pull request list.
pub const PRS: &str = concat!(
    "\
Attribute several pull requests of one repository and sum the results.

The list accepts numbers and inclusive ranges: 12,15,20-24.
Pull requests that fail to load are skipped and listed in the report.

Examples:
  prl prs acme/api 12,15,20-24
  prl prs acme/api 100-120 --exclude-user 'dependabot[bot]'
",
    attribution_notes!()
);

/// Merged pull requests in a date window.
pub const RANGE: &str = concat!(
    "\
Attribute every pull request merged in a date range, across one or more
repositories.

Dates are YYYY-MM-DD or relative to today: 30d, 6m, 1y
(1 month = 30 days, 1 year = 365 days). --until defaults to today.
GitHub search returns at most 1000 pull requests per repository.

Examples:
  prl range --repo acme/api --since 30d
  prl range --repo acme/api --repo acme/web --since 2024-01-01 --until 2024-03-31
",
    attribution_notes!()
);

/// Local branch range.
pub const LOCAL: &str = "\
Attribute a local commit range the way its pull request would be
attributed, without calling GitHub.

File counts come from diffing merge-base(A, B) against B; each file is
split across the non-merge commits in A..B that touched it. Local commits
have no GitHub login, so authors are identified by name. Binary files are
skipped.

Examples:
  prl local                              # origin/main..HEAD in .
  prl local ../service --range main..feature/retries
  prl local --range HEAD~5..HEAD --json";
