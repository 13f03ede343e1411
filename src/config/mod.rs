//! Cache configuration
//!
//! [`CacheConfiguration`] is built once from `prebake.yaml` plus command-line
//! options and then handed by reference to every stage of the fetch. No stage
//! reads environment or working-directory state on its own.
//!
//! ## Layout
//!
//! ```text
//! <cache_path>/
//! ├── Manifest.lock
//! └── GeneratedFrameworks/
//!     ├── Alamofire.zip
//!     └── ...
//! <prebuild_sandbox_path>/
//! ├── Manifest.lock
//! └── GeneratedFrameworks/
//!     └── Alamofire/...
//! ```

pub mod file;

use std::path::{Path, PathBuf};

pub use file::ConfigFile;

/// Manifest file name, both in the cache and in the sandbox
pub const MANIFEST_FILE: &str = "Manifest.lock";

/// Directory holding framework archives (cache) or extracted frameworks (sandbox)
pub const GENERATED_FRAMEWORKS_DIR: &str = "GeneratedFrameworks";

/// Branch checked out when none is given
pub const DEFAULT_CACHE_BRANCH: &str = "master";

/// Number of concurrent extraction workers
pub const DEFAULT_EXTRACT_WORKERS: usize = 8;

/// Resolved configuration for one fetch run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfiguration {
    cache_repo: Option<String>,
    cache_branch: String,
    cache_path: PathBuf,
    prebuild_sandbox_path: PathBuf,
    extract_workers: usize,
}

impl CacheConfiguration {
    /// Configuration for a cache that already lives on disk
    pub fn local(cache_path: impl Into<PathBuf>, prebuild_sandbox_path: impl Into<PathBuf>) -> Self {
        Self {
            cache_repo: None,
            cache_branch: DEFAULT_CACHE_BRANCH.to_string(),
            cache_path: cache_path.into(),
            prebuild_sandbox_path: prebuild_sandbox_path.into(),
            extract_workers: DEFAULT_EXTRACT_WORKERS,
        }
    }

    /// Configuration for a cache synchronized from a git remote
    pub fn remote(
        cache_repo: impl Into<String>,
        cache_branch: impl Into<String>,
        cache_path: impl Into<PathBuf>,
        prebuild_sandbox_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            cache_repo: Some(cache_repo.into()),
            cache_branch: cache_branch.into(),
            cache_path: cache_path.into(),
            prebuild_sandbox_path: prebuild_sandbox_path.into(),
            extract_workers: DEFAULT_EXTRACT_WORKERS,
        }
    }

    /// Override the extraction pool size
    #[must_use]
    pub fn with_extract_workers(mut self, workers: usize) -> Self {
        self.extract_workers = workers.max(1);
        self
    }

    /// Whether the cache is used in place, without git synchronization
    pub fn local_cache(&self) -> bool {
        self.cache_repo.is_none()
    }

    pub fn cache_repo(&self) -> Option<&str> {
        self.cache_repo.as_deref()
    }

    pub fn cache_branch(&self) -> &str {
        &self.cache_branch
    }

    /// Root of the (local or synchronized) cache
    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    /// Destination root for staged artifacts
    pub fn prebuild_sandbox_path(&self) -> &Path {
        &self.prebuild_sandbox_path
    }

    pub fn extract_workers(&self) -> usize {
        self.extract_workers
    }

    /// Manifest location, cache-side when `in_cache` is true
    pub fn manifest_path(&self, in_cache: bool) -> PathBuf {
        self.root(in_cache).join(MANIFEST_FILE)
    }

    /// Frameworks directory, cache-side when `in_cache` is true
    pub fn generated_frameworks_dir(&self, in_cache: bool) -> PathBuf {
        self.root(in_cache).join(GENERATED_FRAMEWORKS_DIR)
    }

    fn root(&self, in_cache: bool) -> &Path {
        if in_cache {
            &self.cache_path
        } else {
            &self.prebuild_sandbox_path
        }
    }
}
