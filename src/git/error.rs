//! Git error classification
//!
//! libgit2 reports a code and a class for every failure. The synchronizer
//! needs to tell an expected outcome ("branch already exists") apart from a
//! real problem (network down), so failures are bucketed into
//! [`GitFailureKind`] instead of being caught wholesale.

use git2::{Error, ErrorClass, ErrorCode};
use thiserror::Error;

/// Coarse cause of a git failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitFailureKind {
    /// Reference or branch already exists
    AlreadyExists,
    /// Reference, branch, remote or repository does not exist
    NotFound,
    /// Transport-level failure
    Network,
    /// Credentials or certificates were rejected
    Auth,
    /// Working tree or index prevents the operation
    Conflict,
    Other,
}

type MessageCheck = fn(&str) -> bool;

const MESSAGE_CLASSIFICATIONS: &[(MessageCheck, GitFailureKind)] = &[
    (
        |msg| msg.contains("already exists"),
        GitFailureKind::AlreadyExists,
    ),
    (
        |msg| {
            msg.contains("not found")
                || msg.contains("404")
                || msg.contains("does not exist")
                || msg.contains("cannot locate")
        },
        GitFailureKind::NotFound,
    ),
    (
        |msg| {
            msg.contains("authentication")
                || msg.contains("credentials")
                || msg.contains("permission denied")
        },
        GitFailureKind::Auth,
    ),
    (
        |msg| {
            msg.contains("connection")
                || msg.contains("network")
                || msg.contains("timeout")
                || msg.contains("timed out")
                || msg.contains("resolve host")
        },
        GitFailureKind::Network,
    ),
];

impl GitFailureKind {
    /// Classify a libgit2 error, trusting its code first, then its class,
    /// then its message
    pub fn classify(err: &Error) -> Self {
        match err.code() {
            ErrorCode::Exists => return Self::AlreadyExists,
            ErrorCode::NotFound | ErrorCode::UnbornBranch => return Self::NotFound,
            ErrorCode::Auth | ErrorCode::Certificate => return Self::Auth,
            ErrorCode::Conflict
            | ErrorCode::MergeConflict
            | ErrorCode::Uncommitted
            | ErrorCode::Locked
            | ErrorCode::Modified
            | ErrorCode::IndexDirty => return Self::Conflict,
            _ => {}
        }

        let message = err.message().to_lowercase();
        for (check, kind) in MESSAGE_CLASSIFICATIONS {
            if check(&message) {
                return *kind;
            }
        }

        match err.class() {
            ErrorClass::Net | ErrorClass::Http | ErrorClass::Ssh | ErrorClass::Ssl => {
                Self::Network
            }
            _ => Self::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AlreadyExists => "already exists",
            Self::NotFound => "not found",
            Self::Network => "network",
            Self::Auth => "authentication",
            Self::Conflict => "conflict",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for GitFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a tolerated git step (fetch, checkout, branch creation)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} ({kind})")]
pub struct GitStepError {
    pub kind: GitFailureKind,
    pub message: String,
}

impl GitStepError {
    pub fn new(kind: GitFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<Error> for GitStepError {
    fn from(err: Error) -> Self {
        Self {
            kind: GitFailureKind::classify(&err),
            message: err.message().to_string(),
        }
    }
}

/// User-facing reason for a failed clone
pub fn interpret_git_error(err: &Error) -> String {
    match GitFailureKind::classify(err) {
        GitFailureKind::NotFound => "Repository not found".to_string(),
        GitFailureKind::Auth => "Authentication failed".to_string(),
        GitFailureKind::Network => format!("Network error: {}", err.message()),
        _ => err.message().to_string(),
    }
}
