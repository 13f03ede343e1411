//! Staging cached frameworks into the prebuild sandbox
//!
//! Every run rebuilds the sandbox from scratch:
//! 1. Remove and recreate the sandbox directory
//! 2. Copy the cache manifest when there is one
//! 3. Collect `GeneratedFrameworks/*.zip` from the cache
//! 4. Extract them concurrently into the sandbox frameworks directory
//!
//! A failing archive does not stop the others. All archives are attempted
//! and the first failure in archive order is reported afterwards; archives
//! that did extract stay in place.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::archive;
use crate::config::CacheConfiguration;
use crate::error::{PrebakeError, Result};
use crate::ui::{ProgressReporter, StatusReporter};

pub struct CacheStagingPipeline<'a> {
    status: &'a dyn StatusReporter,
    progress: &'a dyn ProgressReporter,
}

impl<'a> CacheStagingPipeline<'a> {
    pub fn new(status: &'a dyn StatusReporter, progress: &'a dyn ProgressReporter) -> Self {
        Self { status, progress }
    }

    /// Stage the cache into the sandbox, returning the number of archives extracted
    ///
    /// Fails with [`PrebakeError::NoCachesToUnzip`] when the cache holds no archives.
    pub fn stage(&self, config: &CacheConfiguration) -> Result<usize> {
        let sandbox = config.prebuild_sandbox_path();
        self.status.info(&format!(
            "Unzipping cache: {} -> {}",
            config.cache_path().display(),
            sandbox.display()
        ));

        reset_dir(sandbox)?;
        copy_manifest(config)?;

        let dest = config.generated_frameworks_dir(false);
        fs::create_dir_all(&dest).map_err(|e| PrebakeError::file_operation(&dest, e))?;

        let source_dir = config.generated_frameworks_dir(true);
        let archives = discover_archives(&source_dir)?;
        if archives.is_empty() {
            return Err(PrebakeError::NoCachesToUnzip {
                dir: source_dir.display().to_string(),
            });
        }

        archive::check_collisions(&archives)?;
        self.extract_all(&archives, &dest, config.extract_workers())?;

        info!("Extracted {} archives into {}", archives.len(), dest.display());
        Ok(archives.len())
    }

    fn extract_all(&self, archives: &[PathBuf], dest: &Path, workers: usize) -> Result<()> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("prebake-unzip-{i}"))
            .build()
            .map_err(|e| PrebakeError::IoError {
                message: format!("cannot start extraction workers: {e}"),
            })?;

        self.progress
            .start(u64::try_from(archives.len()).unwrap_or(u64::MAX));

        let results: Vec<Result<()>> = pool.install(|| {
            archives
                .par_iter()
                .map(|path| {
                    let result = archive::extract(path, dest);
                    match &result {
                        Ok(()) => debug!("Extracted {}", path.display()),
                        Err(e) => warn!("{}", e),
                    }
                    self.progress.inc(&archive_name(path));
                    result
                })
                .collect()
        });

        match results.into_iter().find_map(std::result::Result::err) {
            Some(err) => {
                self.progress.abandon();
                Err(err)
            }
            None => {
                self.progress.finish();
                Ok(())
            }
        }
    }
}

/// Zip files directly inside `dir`, sorted by path
///
/// Hidden files are skipped. A missing directory has no archives.
pub fn discover_archives(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(PrebakeError::file_operation(dir, e)),
    };

    let mut archives = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PrebakeError::file_operation(dir, e))?;
        let path = entry.path();

        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        let is_zip = path.extension().is_some_and(|ext| ext == "zip");
        if hidden || !is_zip || !path.is_file() {
            continue;
        }
        archives.push(path);
    }

    archives.sort();
    Ok(archives)
}

fn reset_dir(dir: &Path) -> Result<()> {
    super::remove_path(dir)?;
    fs::create_dir_all(dir).map_err(|e| PrebakeError::file_operation(dir, e))
}

fn copy_manifest(config: &CacheConfiguration) -> Result<()> {
    let source = config.manifest_path(true);
    if !source.is_file() {
        debug!("No manifest at {}", source.display());
        return Ok(());
    }

    let target = config.manifest_path(false);
    fs::copy(&source, &target).map_err(|e| PrebakeError::file_operation(&source, e))?;
    Ok(())
}

fn archive_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
