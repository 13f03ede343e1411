//! Framework archive extraction
//!
//! Archives are plain zip files, each holding one prebuilt framework tree.
//! Several archives are extracted into the same destination concurrently, so
//! their file entries must not overlap; [`check_collisions`] verifies that
//! before any worker starts.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::debug;
use zip::ZipArchive;

use crate::error::{PrebakeError, Result};

fn open(archive: &Path) -> Result<ZipArchive<BufReader<File>>> {
    let file =
        File::open(archive).map_err(|e| PrebakeError::extraction(archive, e.to_string()))?;
    ZipArchive::new(BufReader::new(file))
        .map_err(|e| PrebakeError::extraction(archive, e.to_string()))
}

/// Extract `archive` into `dest`, creating directories as needed
///
/// Entries that would land outside `dest` are rejected.
pub fn extract(archive: &Path, dest: &Path) -> Result<()> {
    let mut zip = open(archive)?;
    zip.extract(dest)
        .map_err(|e| PrebakeError::extraction(archive, e.to_string()))
}

/// Paths of the file entries in `archive`, relative to its root
pub fn file_entries(archive: &Path) -> Result<Vec<PathBuf>> {
    let mut zip = open(archive)?;
    let mut entries = Vec::with_capacity(zip.len());

    for index in 0..zip.len() {
        let entry = zip
            .by_index_raw(index)
            .map_err(|e| PrebakeError::extraction(archive, e.to_string()))?;
        if entry.is_dir() {
            continue;
        }
        let path = entry.enclosed_name().ok_or_else(|| {
            PrebakeError::extraction(archive, format!("unsafe entry path '{}'", entry.name()))
        })?;
        entries.push(path);
    }

    Ok(entries)
}

/// Fail if two of `archives` would write to the same path
///
/// That is the same file entry in two archives, or a file entry in one
/// archive sitting where another archive needs a directory. Directories
/// shared between archives are fine.
///
/// Archives that cannot be read are skipped here; extracting them reports
/// the error against the right archive.
pub fn check_collisions(archives: &[PathBuf]) -> Result<()> {
    let mut files: HashMap<PathBuf, &Path> = HashMap::new();
    let mut dirs: HashMap<PathBuf, &Path> = HashMap::new();

    for archive in archives {
        let entries = match file_entries(archive) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Skipping collision check: {}", e);
                continue;
            }
        };
        let archive = archive.as_path();

        for entry in entries {
            let owner = files.get(&entry).or_else(|| dirs.get(&entry));
            if let Some(first) = owner.filter(|first| **first != archive) {
                return Err(collision(&entry, first, archive));
            }

            for parent in entry.ancestors().skip(1) {
                if parent.as_os_str().is_empty() {
                    continue;
                }
                if let Some(first) = files.get(parent).filter(|first| **first != archive) {
                    return Err(collision(parent, first, archive));
                }
                dirs.entry(parent.to_path_buf()).or_insert(archive);
            }

            files.entry(entry).or_insert(archive);
        }
    }

    Ok(())
}

fn collision(path: &Path, first: &Path, second: &Path) -> PrebakeError {
    PrebakeError::ArchiveCollision {
        path: path.display().to_string(),
        first: first.display().to_string(),
        second: second.display().to_string(),
    }
}
