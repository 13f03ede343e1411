//! CLI definitions using clap derive API
//!
//! Argument types live in one submodule per command:
//! - fetch: Fetch command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

pub mod completions;
pub mod fetch;

pub use completions::CompletionsArgs;
pub use fetch::FetchArgs;

/// Prebake - prebuilt framework cache fetcher
///
/// Fetch a cache of prebuilt frameworks and stage it for the build.
#[derive(Parser, Debug)]
#[command(
    name = "prebake",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Fetch and stage prebuilt framework caches",
    long_about = "Prebake fetches a cache of prebuilt frameworks, either from a local directory \
                  or from a branch of a git repository, and unpacks it into the prebuild sandbox \
                  so the build can skip compiling those dependencies.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  prebake fetch                           \x1b[90m# Fetch the default cache repo\x1b[0m\n   \
                  prebake fetch --cache-branch release-1  \x1b[90m# Use a specific cache branch\x1b[0m\n   \
                  prebake fetch --repo staging            \x1b[90m# Use another configured repo\x1b[0m\n   \
                  prebake -vv fetch                       \x1b[90m# Show git and unzip details\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Configuration file (defaults to ./prebake.yaml)
    #[arg(long, short = 'c', global = true, env = "PREBAKE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the cache and stage it into the prebuild sandbox
    Fetch(FetchArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_fetch_defaults() {
        let cli = Cli::try_parse_from(["prebake", "fetch"]).unwrap();
        match cli.command {
            Commands::Fetch(args) => {
                assert_eq!(args.repo, "default");
                assert_eq!(args.cache_branch, "master");
            }
            _ => panic!("Expected Fetch command"),
        }
    }

    #[test]
    fn test_cli_parsing_fetch_options() {
        let cli = Cli::try_parse_from([
            "prebake",
            "fetch",
            "--repo",
            "staging",
            "--cache-branch",
            "release-1",
        ])
        .unwrap();
        match cli.command {
            Commands::Fetch(args) => {
                assert_eq!(args.repo, "staging");
                assert_eq!(args.cache_branch, "release-1");
            }
            _ => panic!("Expected Fetch command"),
        }
    }

    #[test]
    fn test_cli_parsing_version() {
        let cli = Cli::try_parse_from(["prebake", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
    }

    #[test]
    fn test_cli_global_options() {
        let cli =
            Cli::try_parse_from(["prebake", "-vv", "--config", "/tmp/prebake.yaml", "fetch"])
                .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/prebake.yaml")));
    }

    #[test]
    fn test_cli_global_options_after_subcommand() {
        let cli = Cli::try_parse_from(["prebake", "fetch", "-v"]).unwrap();
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_cli_parsing_completions() {
        let cli = Cli::try_parse_from(["prebake", "completions", "bash"]).unwrap();
        match cli.command {
            Commands::Completions(args) => {
                assert_eq!(args.shell, "bash");
            }
            _ => panic!("Expected Completions command"),
        }
    }

    #[test]
    fn test_cli_requires_command() {
        assert!(Cli::try_parse_from(["prebake"]).is_err());
    }
}
