//! Fetch command implementation
//!
//! Builds the [`CacheConfiguration`] from the configuration file and the
//! command-line options, then runs the fetch pipeline with the libgit2
//! backend and console output.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::cli::FetchArgs;
use crate::config::file::{CONFIG_FILE, ResolveOptions};
use crate::config::{CacheConfiguration, ConfigFile};
use crate::error::{PrebakeError, Result};
use crate::fetch::CacheFetcher;
use crate::git::Git2Backend;
use crate::ui::{self, ConsoleStatus, StatusReporter};

/// Run fetch command
pub fn run(config_path: Option<PathBuf>, args: &FetchArgs) -> Result<()> {
    let config = load_configuration(config_path, args)?;
    debug!("Resolved configuration: {:?}", config);

    if config.local_cache() {
        debug!("No remote configured for '{}'", args.repo);
    }

    let progress = ui::progress_reporter();
    let fetcher = CacheFetcher::new(&Git2Backend, &ConsoleStatus, progress.as_ref());
    let outcome = fetcher.run(&config)?;

    info!("Cache source: {}", outcome.source);
    if let Some(report) = &outcome.sync {
        if report.cloned {
            info!("Cloned cache into {}", config.cache_path().display());
        }
        let unexpected = report.unexpected_failures().count();
        if unexpected > 0 {
            ConsoleStatus.notice(&format!(
                "{unexpected} git step(s) failed, the cache may be out of date \
                 (run with -v for details)"
            ));
        }
    }

    println!("Fetched {} cached frameworks", outcome.extracted);
    Ok(())
}

fn load_configuration(
    config_path: Option<PathBuf>,
    args: &FetchArgs,
) -> Result<CacheConfiguration> {
    let config_path = absolute(&config_path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE)))?;
    let file = ConfigFile::load(&config_path)?;

    let base_dir = config_path
        .parent()
        .map_or_else(|| PathBuf::from("/"), Path::to_path_buf);

    file.resolve(&ResolveOptions {
        repo: &args.repo,
        cache_branch: &args.cache_branch,
        base_dir: &base_dir,
        home_dir: dirs::home_dir(),
        user_cache_dir: dirs::cache_dir(),
    })
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|e| PrebakeError::file_operation(path, e))?;
    Ok(cwd.join(path))
}
