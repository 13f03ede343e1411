//! Common test utilities for Prebake integration tests

#![allow(dead_code)]

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use assert_cmd::Command;
use git2::{IndexAddOption, Repository, RepositoryInitOptions, Signature};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

/// A test workspace for integration tests
pub struct TestWorkspace {
    /// Temporary directory
    pub temp: TempDir,
    /// Path to workspace root
    pub path: PathBuf,
}

impl TestWorkspace {
    /// Create a new test workspace
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Write a file in workspace
    pub fn write_file(&self, path: &str, content: impl AsRef<[u8]>) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from workspace
    pub fn read_file(&self, path: &str) -> String {
        fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    /// Check if a file exists in workspace
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// `prebake` running inside the workspace, isolated from the user's
    /// home, cache directory and configuration
    #[allow(deprecated)]
    pub fn prebake(&self) -> Command {
        let mut cmd = Command::cargo_bin("prebake").expect("prebake binary");
        cmd.current_dir(&self.path)
            .env_remove("PREBAKE_CONFIG")
            .env("HOME", &self.path)
            .env("XDG_CACHE_HOME", self.path.join(".cache"));
        cmd
    }

    /// Write prebake.yaml pointing `default` at `remote` with the cache in `./cache`
    pub fn write_remote_config(&self, remote: &str) {
        self.write_file(
            "prebake.yaml",
            format!(
                "cache_repo:\n  default:\n    remote: {remote}\n    local: cache\n\
                 prebuild_sandbox_path: sandbox\n"
            ),
        );
    }

    /// Write prebake.yaml using `./cache` as a local-only cache
    pub fn write_local_config(&self) {
        self.write_file(
            "prebake.yaml",
            "cache_repo:\n  default:\n    local: cache\nprebuild_sandbox_path: sandbox\n",
        );
    }

    /// Put framework archives straight into the local cache directory
    pub fn add_local_frameworks(&self, names: &[&str]) {
        for name in names {
            self.write_file(
                &format!("cache/GeneratedFrameworks/{name}.zip"),
                framework_zip(name),
            );
        }
    }

    /// Create a git repository at `./origin` whose `branch` holds the given
    /// framework archives and, optionally, a manifest. Returns its URL.
    pub fn create_cache_origin(
        &self,
        branch: &str,
        frameworks: &[&str],
        manifest: Option<&str>,
    ) -> String {
        let origin = self.path.join("origin");
        fs::create_dir_all(&origin).expect("Failed to create origin");
        let mut options = RepositoryInitOptions::new();
        options.initial_head("master");
        let repo = Repository::init_opts(&origin, &options).expect("Failed to init origin");

        fs::write(origin.join("README.md"), "binary cache\n").expect("Failed to write README");
        commit_all(&repo, "Initial commit");

        if branch != "master" {
            let head = repo.head().unwrap().peel_to_commit().unwrap();
            repo.branch(branch, &head, false).unwrap();
            switch(&repo, &format!("refs/heads/{branch}"));
        }

        for name in frameworks {
            let path = origin.join(format!("GeneratedFrameworks/{name}.zip"));
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, framework_zip(name)).unwrap();
        }
        if let Some(manifest) = manifest {
            fs::write(origin.join("Manifest.lock"), manifest).unwrap();
        }
        commit_all(&repo, &format!("Update cache for {branch}"));

        switch(&repo, "refs/heads/master");
        format!("file://{}", origin.display())
    }

    /// Every file under `dir` with its contents, in path order
    pub fn snapshot(&self, dir: &str) -> Vec<(PathBuf, Vec<u8>)> {
        let root = self.path.join(dir);
        walkdir::WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .map(|entry| entry.expect("Failed to walk directory"))
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| {
                let rel = entry.path().strip_prefix(&root).unwrap().to_path_buf();
                let content = fs::read(entry.path()).expect("Failed to read file");
                (rel, content)
            })
            .collect()
    }

    /// Number of entries directly inside `dir`
    pub fn count_entries(&self, dir: &str) -> usize {
        fs::read_dir(self.path.join(dir))
            .expect("Failed to read directory")
            .count()
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Zip holding `<name>/<name>.framework/{<name>, Info.plist}`
pub fn framework_zip(name: &str) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    writer
        .add_directory(format!("{name}/{name}.framework/"), options)
        .unwrap();
    writer
        .start_file(format!("{name}/{name}.framework/{name}"), options)
        .unwrap();
    writer.write_all(name.as_bytes()).unwrap();
    writer
        .start_file(format!("{name}/{name}.framework/Info.plist"), options)
        .unwrap();
    writer.write_all(b"<plist/>").unwrap();

    writer.finish().unwrap().into_inner()
}

fn commit_all(repo: &Repository, message: &str) {
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
        .unwrap();
}

fn switch(repo: &Repository, refname: &str) {
    repo.set_head(refname).unwrap();
    let mut checkout = git2::build::CheckoutBuilder::new();
    checkout.force().remove_untracked(true);
    repo.checkout_head(Some(&mut checkout)).unwrap();
}

/// Path of a framework binary inside the staged sandbox
pub fn staged_binary(name: &str) -> String {
    format!("sandbox/GeneratedFrameworks/{name}/{name}.framework/{name}")
}
