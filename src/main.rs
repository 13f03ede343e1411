//! Prebake - prebuilt framework cache fetcher
//!
//! Fetches a cache of prebuilt frameworks from a local directory or a branch
//! of a git repository and stages it into the prebuild sandbox.

use std::process::ExitCode;

use clap::Parser;
use console::style;
use miette::Diagnostic;
use tracing_subscriber::EnvFilter;

mod archive;
mod cli;
mod commands;
mod config;
mod error;
mod fetch;
mod git;
#[cfg(test)]
mod test_fixtures;
mod ui;

use cli::{Cli, Commands};
use error::Result;

fn init_logging(verbose: u8) {
    // 0 = warn, 1 = info, 2+ = debug
    let filter = match verbose {
        0 => EnvFilter::new("prebake=warn"),
        1 => EnvFilter::new("prebake=info"),
        _ => EnvFilter::new("prebake=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Fetch(args) => commands::fetch::run(cli.config, &args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(&args),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(help) = e.help() {
                eprintln!("{} {}", style("Hint:").yellow(), help);
            }
            ExitCode::FAILURE
        }
    }
}
