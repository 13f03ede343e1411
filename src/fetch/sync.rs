//! Remote cache synchronization
//!
//! Brings the cache clone to the requested branch. Only the initial clone is
//! fatal. Fetch, checkout and branch creation are best-effort: the clone may
//! be fresh or reused, on any branch, so some of these steps are expected to
//! fail. Each failure is classified and logged (`debug` when it is the
//! expected outcome, `warn` otherwise) and the run carries on; whether the
//! cache is usable is decided later by the staging step.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::config::DEFAULT_CACHE_BRANCH;
use crate::error::{PrebakeError, Result};
use crate::git::{GitFailureKind, GitStepError, VersionControl};
use crate::ui::StatusReporter;

/// Tolerated git step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStep {
    Fetch,
    Checkout,
    CreateBranch,
}

impl SyncStep {
    /// Failure kind that is a normal outcome of this step
    fn expected_failure(self) -> Option<GitFailureKind> {
        match self {
            Self::Fetch => None,
            Self::Checkout => Some(GitFailureKind::NotFound),
            Self::CreateBranch => Some(GitFailureKind::AlreadyExists),
        }
    }

    pub fn is_expected(self, error: &GitStepError) -> bool {
        self.expected_failure() == Some(error.kind)
    }
}

impl std::fmt::Display for SyncStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Fetch => "fetch",
            Self::Checkout => "checkout",
            Self::CreateBranch => "create branch",
        })
    }
}

/// What a synchronization did
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Whether the destination was wiped and cloned fresh
    pub cloned: bool,
    /// Tolerated failures, in step order
    pub failures: Vec<(SyncStep, GitStepError)>,
}

impl SyncReport {
    /// Failures that were not the expected outcome of their step
    pub fn unexpected_failures(&self) -> impl Iterator<Item = &(SyncStep, GitStepError)> {
        self.failures.iter().filter(|(step, err)| !step.is_expected(err))
    }
}

pub struct RemoteCacheSynchronizer<'a> {
    vcs: &'a dyn VersionControl,
    status: &'a dyn StatusReporter,
}

impl<'a> RemoteCacheSynchronizer<'a> {
    pub fn new(vcs: &'a dyn VersionControl, status: &'a dyn StatusReporter) -> Self {
        Self { vcs, status }
    }

    /// Ensure `dest` is a checkout of `branch` from `repo`
    pub fn sync(&self, repo: &str, branch: &str, dest: &Path) -> Result<SyncReport> {
        self.status
            .info(&format!("Fetching cache from {repo} (branch: {branch})"));

        let mut report = SyncReport::default();

        if !self.vcs.has_checkout(dest) {
            super::remove_path(dest)?;
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent).map_err(|e| PrebakeError::file_operation(parent, e))?;
            }
            self.vcs.clone_repo(repo, dest)?;
            report.cloned = true;
        }

        self.tolerate(&mut report, SyncStep::Fetch, self.vcs.fetch(dest));

        let checkout = self.vcs.checkout_branch(dest, branch);
        let checked_out = checkout.is_ok();
        self.tolerate(&mut report, SyncStep::Checkout, checkout);

        if checked_out {
            debug!("Branch {} checked out, skipping branch creation", branch);
        } else {
            let created = self
                .vcs
                .create_branch(dest, branch, DEFAULT_CACHE_BRANCH);
            self.tolerate(&mut report, SyncStep::CreateBranch, created);
        }

        Ok(report)
    }

    fn tolerate(
        &self,
        report: &mut SyncReport,
        step: SyncStep,
        result: std::result::Result<(), GitStepError>,
    ) {
        let Err(err) = result else {
            return;
        };
        if step.is_expected(&err) {
            debug!("git {} failed as expected: {}", step, err);
        } else {
            warn!("git {} failed: {}", step, err);
        }
        report.failures.push((step, err));
    }
}
