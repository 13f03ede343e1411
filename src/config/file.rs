//! Configuration file (prebake.yaml) data structures
//!
//! ```yaml
//! cache_repo:
//!   default:
//!     remote: https://github.com/org/binary-cache.git
//!     local: ~/.prebake/binary-cache
//!   offline:
//!     local: ../binary-cache
//! prebuild_sandbox_path: Pods/_Prebuild
//! extract_workers: 8
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{CacheConfiguration, DEFAULT_EXTRACT_WORKERS};
use crate::error::{PrebakeError, Result};

/// Default configuration file name, looked up in the current directory
pub const CONFIG_FILE: &str = "prebake.yaml";

/// Sandbox location used when the file does not set one
pub const DEFAULT_SANDBOX_PATH: &str = "Pods/_Prebuild";

/// Directory under the user cache dir holding synchronized cache repos
const CACHE_HOME_DIR: &str = "prebake";

/// Parsed prebake.yaml
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Named cache repositories
    #[serde(default)]
    pub cache_repo: BTreeMap<String, CacheRepoEntry>,

    /// Where cached frameworks are staged
    #[serde(default)]
    pub prebuild_sandbox_path: Option<String>,

    /// Extraction pool size
    #[serde(default)]
    pub extract_workers: Option<usize>,
}

/// One entry under `cache_repo`
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CacheRepoEntry {
    /// Git remote holding the cache; absent for a local-only cache
    #[serde(default)]
    pub remote: Option<String>,

    /// Cache root on disk
    #[serde(default)]
    pub local: Option<String>,
}

/// Inputs needed to turn a [`ConfigFile`] into a [`CacheConfiguration`]
#[derive(Debug, Clone)]
pub struct ResolveOptions<'a> {
    /// Which `cache_repo` entry to use
    pub repo: &'a str,
    /// Branch to check out for remote caches
    pub cache_branch: &'a str,
    /// Directory relative paths are resolved against
    pub base_dir: &'a Path,
    /// Expansion target for `~/`
    pub home_dir: Option<PathBuf>,
    /// User cache directory, parent of default cache roots
    pub user_cache_dir: Option<PathBuf>,
}

impl ConfigFile {
    /// Parse configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PrebakeError::ConfigNotFound {
                    path: path.display().to_string(),
                });
            }
            Err(e) => return Err(PrebakeError::file_operation(path, e)),
        };

        Self::from_yaml(&content).map_err(|e| match e {
            PrebakeError::ConfigParseFailed { reason, .. } => PrebakeError::ConfigParseFailed {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Resolve the selected cache repo into a run configuration
    pub fn resolve(&self, options: &ResolveOptions<'_>) -> Result<CacheConfiguration> {
        if self.cache_repo.is_empty() {
            return Err(PrebakeError::config_invalid(
                "no cache repos configured under `cache_repo`",
            ));
        }

        let entry =
            self.cache_repo
                .get(options.repo)
                .ok_or_else(|| PrebakeError::UnknownCacheRepo {
                    name: options.repo.to_string(),
                    available: self.cache_repo.keys().cloned().collect::<Vec<_>>().join(", "),
                })?;

        let remote = entry
            .remote
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty());

        let cache_path = match (entry.local.as_deref(), remote) {
            (Some(local), _) => resolve_path(local, options)?,
            (None, Some(_)) => options
                .user_cache_dir
                .as_ref()
                .map(|dir| dir.join(CACHE_HOME_DIR).join(options.repo))
                .ok_or_else(|| {
                    PrebakeError::config_invalid("could not determine the user cache directory")
                })?,
            (None, None) => {
                return Err(PrebakeError::config_invalid(format!(
                    "cache repo '{}' needs a `remote` or a `local` path",
                    options.repo
                )));
            }
        };

        let sandbox = resolve_path(
            self.prebuild_sandbox_path
                .as_deref()
                .unwrap_or(DEFAULT_SANDBOX_PATH),
            options,
        )?;

        let workers = match self.extract_workers {
            Some(0) => {
                return Err(PrebakeError::config_invalid(
                    "extract_workers must be at least 1",
                ));
            }
            Some(n) => n,
            None => DEFAULT_EXTRACT_WORKERS,
        };

        let config = match remote {
            Some(url) => {
                let branch = options.cache_branch.trim();
                if branch.is_empty() {
                    return Err(PrebakeError::config_invalid(
                        "cache branch must not be empty for a remote cache",
                    ));
                }
                CacheConfiguration::remote(url, branch, cache_path, sandbox)
            }
            None => CacheConfiguration::local(cache_path, sandbox),
        };

        Ok(config.with_extract_workers(workers))
    }
}

/// Expand `~/` and anchor relative paths at the configuration directory
fn resolve_path(raw: &str, options: &ResolveOptions<'_>) -> Result<PathBuf> {
    let home_relative = if raw == "~" {
        Some("")
    } else {
        raw.strip_prefix("~/")
    };

    if let Some(rest) = home_relative {
        let home = options.home_dir.as_ref().ok_or_else(|| {
            PrebakeError::config_invalid(format!("cannot expand '{raw}': no home directory"))
        })?;
        return Ok(home.join(rest));
    }

    let path = Path::new(raw);
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(options.base_dir.join(path))
    }
}
