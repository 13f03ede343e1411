//! Test fixtures shared by unit tests: git origins, zip archives and a
//! recording version-control fake.
//!
//! ```ignore
//! use crate::test_fixtures::{file_url, init_origin, write_zip};
//!
//! let origin = init_origin(&temp.path().join("origin"), &[("Manifest.lock", "PODS: []")]);
//! commit_on_branch(&origin_repo, "release-1", &[("GeneratedFrameworks/A.zip", zip_bytes)]);
//! ```

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use git2::{BranchType, IndexAddOption, Oid, Repository, RepositoryInitOptions, Signature};
use zip::write::SimpleFileOptions;

use crate::git::{GitFailureKind, GitStepError, StepResult, VersionControl};

/// `file://` URL for a local repository path
pub fn file_url(path: &Path) -> String {
    format!("file://{}", path.display())
}

/// Create a non-bare repository on `master` with one commit holding `files`
pub fn init_origin<C: AsRef<[u8]>>(path: &Path, files: &[(&str, C)]) -> PathBuf {
    fs::create_dir_all(path).unwrap();
    let mut options = RepositoryInitOptions::new();
    options.initial_head("master");
    let repo = Repository::init_opts(path, &options).unwrap();
    commit_files(&repo, files, "Initial commit");
    path.to_path_buf()
}

/// Write `files` into the work tree and commit them on HEAD
pub fn commit_files<C: AsRef<[u8]>>(repo: &Repository, files: &[(&str, C)], message: &str) -> Oid {
    let workdir = repo.workdir().unwrap().to_path_buf();
    for (name, content) in files {
        let path = workdir.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content.as_ref()).unwrap();
    }

    let mut index = repo.index().unwrap();
    index
        .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
        .unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();

    let sig = Signature::now("Test", "test@test.com").unwrap();
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap()
}

/// Commit `files` on `branch` (created from HEAD if missing), then return to master
pub fn commit_on_branch<C: AsRef<[u8]>>(
    repo: &Repository,
    branch: &str,
    files: &[(&str, C)],
) -> Oid {
    if repo.find_branch(branch, BranchType::Local).is_err() {
        let head = repo.head().unwrap().peel_to_commit().unwrap();
        repo.branch(branch, &head, false).unwrap();
    }

    switch(repo, &format!("refs/heads/{branch}"));
    let oid = commit_files(repo, files, &format!("Update {branch}"));
    switch(repo, "refs/heads/master");
    oid
}

fn switch(repo: &Repository, refname: &str) {
    repo.set_head(refname).unwrap();
    let mut checkout = git2::build::CheckoutBuilder::new();
    checkout.force().remove_untracked(true);
    repo.checkout_head(Some(&mut checkout)).unwrap();
}

/// Zip archive bytes holding `entries` (paths ending in `/` are directories)
pub fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, content) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

/// Write a zip archive to `path`
pub fn write_zip(path: &Path, entries: &[(&str, &str)]) -> PathBuf {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, zip_bytes(entries)).unwrap();
    path.to_path_buf()
}

/// Zip holding a single framework directory named after `name`
pub fn framework_zip(name: &str) -> Vec<u8> {
    let dir = format!("{name}/{name}.framework/");
    let binary = format!("{name}/{name}.framework/{name}");
    let plist = format!("{name}/{name}.framework/Info.plist");
    zip_bytes(&[
        (dir.as_str(), ""),
        (binary.as_str(), name),
        (plist.as_str(), "<plist/>"),
    ])
}

/// [`VersionControl`] fake that records every call
///
/// `clone_repo` creates `dest/.git` so later runs see an existing checkout.
/// Step outcomes are configured per operation name (`fetch`, `checkout`,
/// `create_branch`).
#[derive(Default)]
pub struct RecordingVcs {
    calls: Mutex<Vec<String>>,
    failures: HashMap<&'static str, GitStepError>,
    clone_fails: bool,
}

impl RecordingVcs {
    pub fn failing(mut self, step: &'static str, kind: GitFailureKind) -> Self {
        self.failures
            .insert(step, GitStepError::new(kind, format!("{step} failed")));
        self
    }

    pub fn failing_clone(mut self) -> Self {
        self.clone_fails = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn outcome(&self, step: &str) -> StepResult {
        self.failures.get(step).cloned().map_or(Ok(()), Err)
    }
}

impl VersionControl for RecordingVcs {
    fn clone_repo(&self, url: &str, dest: &Path) -> crate::error::Result<()> {
        self.record(format!("clone {url}"));
        if self.clone_fails {
            return Err(crate::error::PrebakeError::GitCloneFailed {
                url: url.to_string(),
                reason: "Repository not found".to_string(),
            });
        }
        fs::create_dir_all(dest.join(".git")).unwrap();
        Ok(())
    }

    fn fetch(&self, _dest: &Path) -> StepResult {
        self.record("fetch".to_string());
        self.outcome("fetch")
    }

    fn checkout_branch(&self, _dest: &Path, branch: &str) -> StepResult {
        self.record(format!("checkout {branch}"));
        self.outcome("checkout")
    }

    fn create_branch(&self, _dest: &Path, branch: &str, start: &str) -> StepResult {
        self.record(format!("create_branch {branch} {start}"));
        self.outcome("create_branch")
    }
}
