//! Cache fetching
//!
//! [`CacheFetcher::run`] is the whole pipeline: make the cache available
//! (use a local directory or synchronize the git clone), then stage its
//! framework archives into the prebuild sandbox.

pub mod resolver;
pub mod stage;
pub mod sync;

pub use resolver::{CacheSource, CacheSourceResolver};
pub use stage::CacheStagingPipeline;
pub use sync::SyncReport;

use std::fs;
use std::path::Path;

use crate::config::CacheConfiguration;
use crate::error::{PrebakeError, Result};
use crate::git::VersionControl;
use crate::ui::{ProgressReporter, StatusReporter};

/// Result of a successful fetch
#[derive(Debug)]
pub struct FetchOutcome {
    pub source: CacheSource,
    /// Present when the cache was synchronized from a remote
    pub sync: Option<SyncReport>,
    /// Number of archives extracted into the sandbox
    pub extracted: usize,
}

pub struct CacheFetcher<'a> {
    vcs: &'a dyn VersionControl,
    status: &'a dyn StatusReporter,
    progress: &'a dyn ProgressReporter,
}

impl<'a> CacheFetcher<'a> {
    pub fn new(
        vcs: &'a dyn VersionControl,
        status: &'a dyn StatusReporter,
        progress: &'a dyn ProgressReporter,
    ) -> Self {
        Self {
            vcs,
            status,
            progress,
        }
    }

    pub fn run(&self, config: &CacheConfiguration) -> Result<FetchOutcome> {
        self.status.step("Fetching cache");

        let (source, sync) = CacheSourceResolver::new(self.vcs, self.status).resolve(config)?;
        let extracted = CacheStagingPipeline::new(self.status, self.progress).stage(config)?;

        Ok(FetchOutcome {
            source,
            sync,
            extracted,
        })
    }
}

/// Remove whatever is at `path` (directory, file or nothing)
fn remove_path(path: &Path) -> Result<()> {
    let result = match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => Err(e),
    };
    result.map_err(|e| PrebakeError::file_operation(path, e))
}
