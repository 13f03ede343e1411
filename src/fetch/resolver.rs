//! Local vs. remote cache dispatch

use std::path::PathBuf;

use super::sync::{RemoteCacheSynchronizer, SyncReport};
use crate::config::CacheConfiguration;
use crate::error::Result;
use crate::git::VersionControl;
use crate::ui::StatusReporter;

const REMOTE_CACHE_DOC: &str = "https://github.com/grab/cocoapods-binary-cache/blob/master/docs/configure_cocoapods_binary_cache.md#cache_repo-";

/// Where the cache comes from, decided once per run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheSource {
    /// Cache already on disk, used as is
    Local(PathBuf),
    /// Cache synchronized from a git remote
    Remote { url: String, branch: String },
}

impl CacheSource {
    pub fn from_config(config: &CacheConfiguration) -> Self {
        match config.cache_repo() {
            Some(url) => Self::Remote {
                url: url.to_string(),
                branch: config.cache_branch().to_string(),
            },
            None => Self::Local(config.cache_path().to_path_buf()),
        }
    }
}

impl std::fmt::Display for CacheSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local(path) => write!(f, "local cache at {}", path.display()),
            Self::Remote { url, branch } => write!(f, "{url} (branch: {branch})"),
        }
    }
}

pub struct CacheSourceResolver<'a> {
    vcs: &'a dyn VersionControl,
    status: &'a dyn StatusReporter,
}

impl<'a> CacheSourceResolver<'a> {
    pub fn new(vcs: &'a dyn VersionControl, status: &'a dyn StatusReporter) -> Self {
        Self { vcs, status }
    }

    /// Make the cache at `config.cache_path()` ready for staging
    ///
    /// A local cache only gets a notice. A remote one is synchronized, and
    /// only its clone step can fail.
    pub fn resolve(
        &self,
        config: &CacheConfiguration,
    ) -> Result<(CacheSource, Option<SyncReport>)> {
        let source = CacheSource::from_config(config);

        let report = match &source {
            CacheSource::Local(path) => {
                self.print_local_cache_notice(path);
                None
            }
            CacheSource::Remote { url, branch } => Some(
                RemoteCacheSynchronizer::new(self.vcs, self.status).sync(
                    url,
                    branch,
                    config.cache_path(),
                )?,
            ),
        };

        Ok((source, report))
    }

    fn print_local_cache_notice(&self, cache_dir: &std::path::Path) {
        self.status.notice(&format!(
            "You're using local cache at: {}.",
            cache_dir.display()
        ));
        self.status.plain(
            "To enable remote cache (with a git repo), add the `remote` field to the repo \
             config in the `cache_repo` option.",
        );
        self.status.plain("For more details, check out this doc:");
        self.status.plain(&format!("  {REMOTE_CACHE_DOC}"));
    }
}
