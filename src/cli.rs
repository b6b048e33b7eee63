/// CLI argument definitions for the `prl` command.
///
/// Defines all subcommands, their arguments, and long help text
/// using the `clap` derive macros.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::attribution::ClassificationConfig;
use crate::cli_help;
use crate::git::DEFAULT_RANGE;

/// Top-level CLI parser with a single subcommand selector.
#[derive(Parser)]
#[command(
    name = "prl",
    version,
    about = "Attribute pull request lines to human, AI and pair contributors"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments shared by every analysis command.
#[derive(Args)]
pub struct AttributionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show only the top N contributors, 0 for all (default: 20)
    #[arg(long, default_value = "20")]
    pub top: usize,

    /// Config file (default: ~/.config/prlines/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// More diagnostics on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Email whose commits count as AI (repeatable, comma-separated)
    #[arg(long = "ai-email", value_name = "EMAIL", value_delimiter = ',')]
    pub ai_emails: Vec<String>,

    /// Drop a contributor by login or name
    #[arg(long = "exclude-user", value_name = "USER", value_delimiter = ',')]
    pub exclude_users: Vec<String>,

    /// Drop a contributor by email
    #[arg(long = "exclude-email", value_name = "EMAIL", value_delimiter = ',')]
    pub exclude_emails: Vec<String>,

    /// Ignore files matching a glob (e.g. "**/*.lock", "dist/**")
    #[arg(long = "exclude-file", value_name = "GLOB", value_delimiter = ',')]
    pub exclude_files: Vec<String>,

    /// Ignore commits whose message contains this text
    #[arg(long = "exclude-message", value_name = "TEXT")]
    pub exclude_messages: Vec<String>,
}

impl AttributionArgs {
    /// Classification values given on the command line.
    pub fn classification(&self) -> ClassificationConfig {
        ClassificationConfig {
            ai_emails: self.ai_emails.clone(),
            exclude_users: self.exclude_users.clone(),
            exclude_emails: self.exclude_emails.clone(),
            exclude_files: self.exclude_files.clone(),
            exclude_messages: self.exclude_messages.clone(),
        }
    }
}

/// All available subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Attribute the lines of one pull request
    #[command(long_about = cli_help::PR)]
    Pr {
        /// Repository as OWNER/REPO
        repo: String,

        /// Pull request number
        number: u64,

        #[command(flatten)]
        args: AttributionArgs,
    },

    /// Attribute a list of pull requests of one repository
    #[command(long_about = cli_help::PRS)]
    Prs {
        /// Repository as OWNER/REPO
        repo: String,

        /// Pull request numbers, e.g. 12,15,20-24
        list: String,

        #[command(flatten)]
        args: AttributionArgs,
    },

    /// Attribute pull requests merged in a date range
    #[command(long_about = cli_help::RANGE)]
    Range {
        /// Repository as OWNER/REPO (repeatable)
        #[arg(long = "repo", value_name = "OWNER/REPO", required = true)]
        repos: Vec<String>,

        /// Start date: YYYY-MM-DD or relative (30d, 6m, 1y)
        #[arg(long)]
        since: String,

        /// End date, inclusive (default: today)
        #[arg(long)]
        until: Option<String>,

        #[command(flatten)]
        args: AttributionArgs,
    },

    /// Attribute a local branch range before opening a pull request
    #[command(long_about = cli_help::LOCAL)]
    Local {
        /// Repository directory (default: current directory)
        path: Option<PathBuf>,

        /// Commit range A..B
        #[arg(long, default_value = DEFAULT_RANGE)]
        range: String,

        #[command(flatten)]
        args: AttributionArgs,
    },

    /// Print a shell completion script
    Completions {
        /// Target shell
        shell: Shell,
    },
}

impl Commands {
    /// Shared arguments of an analysis command.
    pub fn attribution_args(&self) -> Option<&AttributionArgs> {
        match self {
            Commands::Pr { args, .. }
            | Commands::Prs { args, .. }
            | Commands::Range { args, .. }
            | Commands::Local { args, .. } => Some(args),
            Commands::Completions { .. } => None,
        }
    }
}
