//! Error types and handling for Prebake
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Only fatal conditions live here. Failures of the tolerated git steps
//! (fetch, branch checkout, branch creation) are reported as
//! [`crate::git::GitStepError`] and never become a [`PrebakeError`].

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for Prebake operations
#[derive(Error, Diagnostic, Debug)]
pub enum PrebakeError {
    // Cache errors
    #[error("No caches to unzip")]
    #[diagnostic(
        code(prebake::cache::empty),
        help("No *.zip archives were found in {dir}. Check the cache branch and repository.")
    )]
    NoCachesToUnzip { dir: String },

    // Git errors
    #[error("Failed to clone repository: {url}: {reason}")]
    #[diagnostic(
        code(prebake::git::clone_failed),
        help("Check that URL is correct and you have access to repository")
    )]
    GitCloneFailed { url: String, reason: String },

    #[error("Git operation failed: {message}")]
    #[diagnostic(code(prebake::git::operation_failed))]
    GitOperationFailed { message: String },

    // Archive errors
    #[error("Failed to extract archive '{archive}': {reason}")]
    #[diagnostic(code(prebake::archive::extract_failed))]
    ExtractionFailed { archive: String, reason: String },

    #[error("Archives '{first}' and '{second}' both contain '{path}'")]
    #[diagnostic(
        code(prebake::archive::collision),
        help("Each cached framework archive must unpack into its own paths")
    )]
    ArchiveCollision {
        path: String,
        first: String,
        second: String,
    },

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(prebake::config::not_found),
        help("Create prebake.yaml or pass --config <file>")
    )]
    ConfigNotFound { path: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(prebake::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(prebake::config::invalid))]
    ConfigInvalid { message: String },

    #[error("Cache repo '{name}' is not configured")]
    #[diagnostic(
        code(prebake::config::unknown_repo),
        help("Available cache repos: {available}")
    )]
    UnknownCacheRepo { name: String, available: String },

    // CLI errors
    #[error("Unknown shell: {shell}")]
    #[diagnostic(
        code(prebake::cli::unknown_shell),
        help("Supported shells: bash, elvish, fish, powershell, zsh")
    )]
    UnknownShell { shell: String },

    // File system errors
    #[error("File operation failed: {path}: {reason}")]
    #[diagnostic(code(prebake::fs::operation_failed))]
    FileOperationFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(prebake::fs::io_error))]
    IoError { message: String },
}

impl PrebakeError {
    /// Wrap an IO error with the path it happened on
    pub fn file_operation(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        PrebakeError::FileOperationFailed {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }

    /// Creates an extraction failure attributed to one archive
    pub fn extraction(archive: &std::path::Path, reason: impl Into<String>) -> Self {
        PrebakeError::ExtractionFailed {
            archive: archive.display().to_string(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid configuration error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        PrebakeError::ConfigInvalid {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for PrebakeError {
    fn from(err: std::io::Error) -> Self {
        PrebakeError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for PrebakeError {
    fn from(err: serde_yaml::Error) -> Self {
        PrebakeError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<git2::Error> for PrebakeError {
    fn from(err: git2::Error) -> Self {
        PrebakeError::GitOperationFailed {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, PrebakeError>;
