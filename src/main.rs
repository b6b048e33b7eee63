mod attribution;
mod cli;
mod cli_help;
mod config;
mod git;
mod github;
mod logger;
mod report_helpers;
mod run;
mod util;

use std::error::Error;
use std::path::Path;

use clap::{CommandFactory, Parser};

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    if let Err(err) = dispatch(cli.command) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn dispatch(command: Commands) -> Result<(), Box<dyn Error>> {
    if let Commands::Completions { shell } = command {
        clap_complete::generate(shell, &mut Cli::command(), "prl", &mut std::io::stdout());
        return Ok(());
    }

    let Some(args) = command.attribution_args() else {
        return Ok(());
    };
    logger::init(args.verbose);
    let opts = run::Options {
        json: args.json,
        top: args.top,
        config_path: args.config.as_deref(),
        classification: args.classification(),
    };

    match &command {
        Commands::Pr { repo, number, .. } => run::run_pr(repo, *number, &opts),
        Commands::Prs { repo, list, .. } => run::run_prs(repo, list, &opts),
        Commands::Range {
            repos,
            since,
            until,
            ..
        } => run::run_range(repos, since, until.as_deref(), &opts),
        Commands::Local { path, range, .. } => {
            let target = path.as_deref().unwrap_or_else(|| Path::new("."));
            run::run_local(target, range, &opts)
        }
        Commands::Completions { .. } => Ok(()),
    }
}
