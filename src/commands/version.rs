//! Version command implementation

use crate::config::{DEFAULT_EXTRACT_WORKERS, MANIFEST_FILE};
use crate::error::Result;

/// Run version command
pub fn run() -> Result<()> {
    println!("prebake {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Build info:");
    println!("  Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    println!("  Profile: {}", build_profile());
    println!("  libgit2: {}", libgit2_version());
    println!();
    println!("Defaults:");
    println!("  Manifest: {MANIFEST_FILE}");
    println!("  Extraction workers: {DEFAULT_EXTRACT_WORKERS}");

    Ok(())
}

fn build_profile() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}

fn libgit2_version() -> String {
    let (major, minor, patch) = git2::Version::get().libgit2_version();
    format!("{major}.{minor}.{patch}")
}
