//! # Version-Control Operations
//!
//! The pipeline talks to git through the [`GitOperations`] trait rather than
//! calling [`crate::git`] directly. This separates the pipeline logic from the
//! concrete git transport, so tests can replace it with an in-process mock that
//! simulates clones, remote failures or network errors without running git.
//!
//! In the application, [`DefaultGitOperations`] wraps the system `git`
//! command.

use std::path::Path;

use crate::error::Result;

/// Trait for git operations - allows mocking in tests
pub trait GitOperations: Send + Sync {
    /// Clones `ref_name` of `url` into `target_dir`.
    ///
    /// This is expected to be a shallow clone to optimize for speed and disk
    /// space.
    fn clone_shallow(&self, url: &str, ref_name: &str, target_dir: &Path) -> Result<()>;

    /// Initializes a repository in `dir`; must succeed on an existing one.
    fn init(&self, dir: &Path) -> Result<()>;

    /// Lists the names of the remotes configured in `dir`.
    fn list_remotes(&self, dir: &Path) -> Result<Vec<String>>;

    /// Removes a remote.
    fn remove_remote(&self, dir: &Path, name: &str) -> Result<()>;

    /// Adds a remote.
    fn add_remote(&self, dir: &Path, name: &str, url: &str) -> Result<()>;
}

/// The default implementation of `GitOperations`, which uses the system's
/// `git` command to perform real Git operations.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultGitOperations;

impl GitOperations for DefaultGitOperations {
    fn clone_shallow(&self, url: &str, ref_name: &str, target_dir: &Path) -> Result<()> {
        crate::git::clone_shallow(url, ref_name, target_dir)
    }

    fn init(&self, dir: &Path) -> Result<()> {
        crate::git::init(dir)
    }

    fn list_remotes(&self, dir: &Path) -> Result<Vec<String>> {
        crate::git::list_remotes(dir)
    }

    fn remove_remote(&self, dir: &Path, name: &str) -> Result<()> {
        crate::git::remove_remote(dir, name)
    }

    fn add_remote(&self, dir: &Path, name: &str, url: &str) -> Result<()> {
        crate::git::add_remote(dir, name, url)
    }
}
