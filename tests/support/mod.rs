//! Test support utilities for stagenv integration tests.
//!
//! Provides reusable project setup and helper commands.

#![allow(dead_code)]


#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test project in an isolated temp directory.
///
/// No process-global state is mutated: child processes use `.current_dir()`
/// so tests can safely run in parallel.
pub struct Test {
    pub dir: TempDir,
}

impl Test {
    /// Empty project without a config file.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        Self { dir }
    }

    /// Project with the standard config and both YAML files.
    pub fn init() -> Self {
        let t = Self::new();
        t.write("stagenv.toml", CONFIG);
        t.write("some/path.yml", &path_yml());
        t.write("some/otherPath.yml", OTHER_PATH_YML);
        t
    }

    /// Project whose YAML files hold no encrypted values.
    pub fn plain() -> Self {
        let t = Self::new();
        t.write("stagenv.toml", CONFIG);
        t.write("some/path.yml", PLAIN_PATH_YML);
        t.write("some/otherPath.yml", OTHER_PATH_YML);
        t
    }

    /// Write a file relative to the project directory.
    pub fn write(&self, rel: &str, contents: &str) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        fs::write(path, contents).expect("failed to write fixture");
    }

    /// Read a file relative to the project directory.
    pub fn read(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel)).expect("failed to read file")
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.path(rel).exists()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }
}
