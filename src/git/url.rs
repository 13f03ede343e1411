//! URL normalization for libgit2
//!
//! - SCP-style SSH (`git@host:path`) becomes `ssh://git@host/path`
//! - `file://relative` and backslash paths become `file:///...`

use std::borrow::Cow;
use std::path::Path;

/// Whether a remote points at the local filesystem
pub fn is_local_url(url: &str) -> bool {
    url.starts_with("file://") || url.starts_with('/') || Path::new(url).is_absolute()
}

/// Rewrite a remote URL into a form libgit2 accepts
pub fn normalize_remote_url(url: &str) -> Cow<'_, str> {
    match normalize_ssh_url(url) {
        Cow::Borrowed(url) => normalize_file_url(url),
        Cow::Owned(url) => Cow::Owned(url),
    }
}

fn normalize_ssh_url(url: &str) -> Cow<'_, str> {
    if !url.starts_with("git@") {
        return Cow::Borrowed(url);
    }

    match url.split_once(':') {
        Some((host, path)) => {
            let path = path.strip_prefix('/').unwrap_or(path);
            Cow::Owned(format!("ssh://{host}/{path}"))
        }
        None => Cow::Borrowed(url),
    }
}

fn normalize_file_url(url: &str) -> Cow<'_, str> {
    let Some(after) = url.strip_prefix("file://") else {
        return Cow::Borrowed(url);
    };
    if after.contains('\\') {
        let path = after.replace('\\', "/");
        let path = path.trim_start_matches('/');
        return Cow::Owned(format!("file:///{path}"));
    }
    if !after.is_empty() && !after.starts_with('/') {
        return Cow::Owned(format!("file:///{after}"));
    }
    Cow::Borrowed(url)
}
