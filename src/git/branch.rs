//! Branch checkout and creation
//!
//! These mirror `git checkout <branch>` and `git checkout -b <branch> <start>`
//! closely enough for a cache clone:
//! - a branch that exists only on `origin` is created locally, tracking it
//! - a local branch strictly behind its upstream is fast-forwarded first

use git2::build::CheckoutBuilder;
use git2::{Branch, BranchType, ErrorCode, Oid, Repository};
use tracing::debug;

use super::REMOTE;
use super::error::{GitFailureKind, GitStepError};

type StepResult<T = ()> = std::result::Result<T, GitStepError>;

/// Check out `branch`, creating a tracking branch from `origin/<branch>` if needed
pub fn checkout_branch(repo: &Repository, branch: &str) -> StepResult {
    let local = match repo.find_branch(branch, BranchType::Local) {
        Ok(local) => local,
        Err(e) if e.code() == ErrorCode::NotFound => track_remote_branch(repo, branch)?,
        Err(e) => return Err(e.into()),
    };

    let refname = reference_name(&local)?;
    let current = local.get().target().ok_or_else(|| {
        GitStepError::new(
            GitFailureKind::Other,
            format!("branch '{branch}' is not a direct reference"),
        )
    })?;
    let target = fast_forward_target(repo, &local, current)?;

    switch_to(repo, &refname, target)?;

    if target != current {
        debug!("Fast-forwarded {} to {}", branch, target);
        repo.find_reference(&refname)?
            .set_target(target, "prebake: fast-forward")?;
    }
    repo.set_head(&refname)?;
    Ok(())
}

/// Create `branch` at `start` and check it out
///
/// Fails with [`GitFailureKind::AlreadyExists`] when the branch is already there.
pub fn create_branch(repo: &Repository, branch: &str, start: &str) -> StepResult {
    let start_commit = repo.revparse_single(start)?.peel_to_commit()?;
    let created = repo.branch(branch, &start_commit, false)?;
    let refname = reference_name(&created)?;

    switch_to(repo, &refname, start_commit.id())?;
    repo.set_head(&refname)?;
    Ok(())
}

fn track_remote_branch<'r>(repo: &'r Repository, branch: &str) -> StepResult<Branch<'r>> {
    let upstream_name = format!("{REMOTE}/{branch}");
    let remote_branch = repo
        .find_branch(&upstream_name, BranchType::Remote)
        .map_err(|e| {
            if e.code() == ErrorCode::NotFound {
                GitStepError::new(
                    GitFailureKind::NotFound,
                    format!("pathspec '{branch}' did not match any branch"),
                )
            } else {
                e.into()
            }
        })?;

    let commit = remote_branch.get().peel_to_commit()?;
    let mut local = repo.branch(branch, &commit, false)?;
    local.set_upstream(Some(&upstream_name))?;
    debug!("Created branch {} tracking {}", branch, upstream_name);
    Ok(local)
}

/// Upstream tip when `local` can fast-forward to it, otherwise `current`
fn fast_forward_target(repo: &Repository, local: &Branch<'_>, current: Oid) -> StepResult<Oid> {
    let upstream = match local.upstream() {
        Ok(upstream) => upstream,
        Err(e) if e.code() == ErrorCode::NotFound => return Ok(current),
        Err(e) => return Err(e.into()),
    };

    match upstream.get().target() {
        Some(tip) if tip != current && repo.graph_descendant_of(tip, current)? => Ok(tip),
        _ => Ok(current),
    }
}

/// Update the work tree to `target` while HEAD still names the old commit,
/// so the safe checkout compares against what is actually on disk
fn switch_to(repo: &Repository, refname: &str, target: Oid) -> StepResult {
    let commit = repo.find_commit(target)?;
    let mut checkout = CheckoutBuilder::new();
    checkout.safe();
    repo.checkout_tree(commit.as_object(), Some(&mut checkout))
        .map_err(|e| {
            GitStepError::new(
                GitFailureKind::classify(&e),
                format!("cannot switch to {refname}: {}", e.message()),
            )
        })
}

fn reference_name(branch: &Branch<'_>) -> StepResult<String> {
    branch.get().name().map(str::to_string).ok_or_else(|| {
        GitStepError::new(GitFailureKind::Other, "branch name is not valid UTF-8")
    })
}
