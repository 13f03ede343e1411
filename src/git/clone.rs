//! Repository cloning

use std::path::Path;

use git2::{Repository, build::RepoBuilder};
use tracing::debug;

use super::auth::fetch_options;
use super::error::interpret_git_error;
use super::url::normalize_remote_url;
use crate::error::{PrebakeError, Result};

/// Clone `url` into `target`
///
/// The clone is full (not shallow): the synchronizer checks out arbitrary
/// cache branches afterwards, so every remote branch must be present.
/// `target` must not exist or be empty.
pub fn clone(url: &str, target: &Path) -> Result<Repository> {
    let mut builder = RepoBuilder::new();
    builder.fetch_options(fetch_options(url));

    let url_to_clone = normalize_remote_url(url);
    debug!("Cloning {} into {}", url_to_clone, target.display());

    builder
        .clone(url_to_clone.as_ref(), target)
        .map_err(|e| PrebakeError::GitCloneFailed {
            url: url.to_string(),
            reason: interpret_git_error(&e),
        })
}
