//! Fetching updates for an existing clone

use git2::Repository;
use tracing::debug;

use super::REMOTE;
use super::auth::fetch_options;
use super::error::GitStepError;

/// Fetch `origin` using its configured refspecs
///
/// Credential callbacks are only attached when `origin` is not local.
pub fn fetch(repo: &Repository) -> std::result::Result<(), GitStepError> {
    let mut remote = repo.find_remote(REMOTE)?;
    let mut options = fetch_options(remote.url().unwrap_or_default());

    remote.fetch(&[] as &[&str], Some(&mut options), None)?;

    let stats = remote.stats();
    debug!(
        "Fetched {} objects ({} bytes) from {}",
        stats.received_objects(),
        stats.received_bytes(),
        REMOTE
    );
    Ok(())
}
