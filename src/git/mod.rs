//! Git operations for the remote cache clone
//!
//! This module handles:
//! - Cloning the cache repository (HTTPS, SSH and `file://`)
//! - Fetching updates for an existing clone
//! - Checking out and creating cache branches
//!
//! Authentication is delegated to git's native mechanisms (SSH agent and
//! keys under `~/.ssh/`, credential helpers).
//!
//! Everything the synchronizer needs goes through [`VersionControl`], so
//! tests can record the step sequence without touching a real repository.

mod auth;
mod branch;
mod clone;
mod error;
mod fetch;
mod url;

use std::path::Path;

use git2::Repository;

pub use error::{GitFailureKind, GitStepError};

use crate::error::Result;

/// Name of the remote every cache clone tracks
pub const REMOTE: &str = "origin";

/// Outcome of a tolerated git step
pub type StepResult = std::result::Result<(), GitStepError>;

/// Version-control operations on a cache clone
///
/// `clone_repo` failures are fatal. The other steps report a [`GitStepError`]
/// that the caller decides whether to tolerate.
pub trait VersionControl: Send + Sync {
    /// Whether `dest` holds a repository checkout (a `.git` directory)
    fn has_checkout(&self, dest: &Path) -> bool {
        dest.join(".git").is_dir()
    }

    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()>;

    fn fetch(&self, dest: &Path) -> StepResult;

    fn checkout_branch(&self, dest: &Path, branch: &str) -> StepResult;

    /// Create `branch` from `start` and check it out
    fn create_branch(&self, dest: &Path, branch: &str, start: &str) -> StepResult;
}

/// [`VersionControl`] backed by libgit2
#[derive(Debug, Default, Clone, Copy)]
pub struct Git2Backend;

impl Git2Backend {
    fn open(dest: &Path) -> std::result::Result<Repository, GitStepError> {
        Repository::open(dest).map_err(|e| {
            GitStepError::new(
                GitFailureKind::classify(&e),
                format!("cannot open {}: {}", dest.display(), e.message()),
            )
        })
    }
}

impl VersionControl for Git2Backend {
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        clone::clone(url, dest).map(drop)
    }

    fn fetch(&self, dest: &Path) -> StepResult {
        fetch::fetch(&Self::open(dest)?)
    }

    fn checkout_branch(&self, dest: &Path, branch: &str) -> StepResult {
        branch::checkout_branch(&Self::open(dest)?, branch)
    }

    fn create_branch(&self, dest: &Path, branch: &str, start: &str) -> StepResult {
        branch::create_branch(&Self::open(dest)?, branch, start)
    }
}
