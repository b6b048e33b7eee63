//! Command entry points: load config, compile the rules, collect pull
//! requests (or a local range) and print the report.

pub mod pipeline;
mod report;

use std::error::Error;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::attribution::ledger::Ledger;
use crate::attribution::summary::{AttributionSummary, summarize};
use crate::attribution::{ClassificationConfig, Rules};
use crate::config::{self, Config};
use crate::git::GitRepo;
use crate::github::{GithubClient, RepoSlug};
use crate::util::{DateWindow, parse_pr_numbers};
use pipeline::{CommitTally, Skipped};

/// What a run covered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum Scope {
    SinglePr {
        repository: String,
        number: u64,
        title: String,
        url: String,
        merged_at: Option<DateTime<Utc>>,
    },
    PrList {
        repository: String,
        requested: Vec<u64>,
        analyzed: Vec<u64>,
    },
    DateRange {
        repositories: Vec<String>,
        since: NaiveDate,
        until: NaiveDate,
        pull_requests: usize,
    },
    LocalRange {
        path: String,
        range: String,
        commits: usize,
    },
}

/// Result record shared by every mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributionReport {
    #[serde(flatten)]
    pub scope: Scope,
    pub summary: AttributionSummary,
    pub commits: CommitTally,
    pub skipped: Vec<Skipped>,
}

impl AttributionReport {
    pub fn new(
        scope: Scope,
        ledger: &Ledger,
        commits: CommitTally,
        skipped: Vec<Skipped>,
        rules: &Rules,
    ) -> Self {
        Self {
            scope,
            summary: summarize(ledger, &rules.ai_emails),
            commits,
            skipped,
        }
    }
}

/// Options shared by every analysis command.
pub struct Options<'a> {
    pub json: bool,
    /// Contributors shown; 0 shows everyone.
    pub top: usize,
    pub config_path: Option<&'a Path>,
    /// Classification values given on the command line, unioned with the
    /// config file.
    pub classification: ClassificationConfig,
}

struct Session {
    config: Config,
    rules: Rules,
}

impl Session {
    fn load(opts: &Options) -> Result<Self, Box<dyn Error>> {
        let config = config::load(opts.config_path)?;
        let mut classification = config.attribution.clone();
        classification.extend(opts.classification.clone());
        let rules = Rules::from_config(&classification)
            .map_err(|e| format!("invalid exclude pattern: {e}"))?;
        if rules.exclude.is_empty() {
            debug!("no exclusion rules");
        }
        if rules.ai_emails.is_empty() {
            info!("no AI emails configured; every commit counts as human");
        }
        Ok(Self { config, rules })
    }

    fn client(&self) -> Result<GithubClient, Box<dyn Error>> {
        let token = self.config.resolve_token();
        if token.is_none() {
            warn!("no GitHub token (GITHUB_TOKEN, GH_TOKEN or config); requests are unauthenticated");
        }
        Ok(GithubClient::new(
            &self.config.github.api_url,
            token.as_deref(),
        )?)
    }
}

/// `prl pr OWNER/REPO NUMBER`
pub fn run_pr(repo: &str, number: u64, opts: &Options) -> Result<(), Box<dyn Error>> {
    let repo: RepoSlug = repo.parse()?;
    let session = Session::load(opts)?;
    let client = session.client()?;

    let report = pipeline::single_pr(&client, &repo, number, &session.rules)
        .map_err(|e| format!("{repo}#{number}: {e}"))?;
    report::output(report, opts.top, opts.json)
}

/// `prl prs OWNER/REPO LIST`
pub fn run_prs(repo: &str, list: &str, opts: &Options) -> Result<(), Box<dyn Error>> {
    let repo: RepoSlug = repo.parse()?;
    let numbers = parse_pr_numbers(list)?;
    let session = Session::load(opts)?;
    let client = session.client()?;

    let report = pipeline::pr_list(&client, &repo, &numbers, &session.rules);
    report::output(report, opts.top, opts.json)
}

/// `prl range --repo OWNER/REPO... --since DATE [--until DATE]`
pub fn run_range(
    repos: &[String],
    since: &str,
    until: Option<&str>,
    opts: &Options,
) -> Result<(), Box<dyn Error>> {
    let mut slugs: Vec<RepoSlug> = Vec::new();
    for repo in repos {
        let slug: RepoSlug = repo.parse()?;
        if !slugs.contains(&slug) {
            slugs.push(slug);
        }
    }
    if slugs.is_empty() {
        return Err("at least one --repo is required".into());
    }
    let window = DateWindow::parse(since, until)?;
    let session = Session::load(opts)?;
    let client = session.client()?;

    let report = pipeline::date_range(&client, &slugs, &window, &session.rules);
    report::output(report, opts.top, opts.json)
}

/// `prl local [PATH] [--range A..B]`
pub fn run_local(path: &Path, range: &str, opts: &Options) -> Result<(), Box<dyn Error>> {
    let session = Session::load(opts)?;
    let git_repo =
        GitRepo::open(path).map_err(|e| format!("not a git repository (or any parent): {e}"))?;
    let changes = git_repo
        .range_changes(range)
        .map_err(|e| format!("cannot read range {range}: {e}"))?;
    info!(
        "{range}: {} files, {} commits",
        changes.files.len(),
        changes.commits.len()
    );

    let report = pipeline::local_range(
        &changes,
        &path.display().to_string(),
        range,
        &session.rules,
    );
    report::output(report, opts.top, opts.json)
}
