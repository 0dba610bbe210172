//! Thin wrappers around the system `git` command.
//!
//! Every function takes the repository directory explicitly and runs
//! `git -C <dir>`; nothing here depends on the process working directory.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use crate::error::{Error, Result};

/// Clone a repository at a specific ref using shallow clone
///
/// This uses the system git command, which automatically handles:
/// - SSH keys from ~/.ssh/
/// - Git credential helpers
/// - Personal access tokens
/// - Any authentication configured in ~/.gitconfig
pub fn clone_shallow(url: &str, ref_name: &str, target_dir: &Path) -> Result<()> {
    // git won't clone into an existing non-empty dir
    if target_dir.exists() {
        fs::remove_dir_all(target_dir)?;
    }

    if let Some(parent) = target_dir.parent() {
        fs::create_dir_all(parent)?;
    }

    let output = Command::new("git")
        .args(["clone", "--depth=1", "--branch", ref_name, url])
        .arg(target_dir)
        .output()
        .map_err(|e| Error::GitClone {
            url: url.to_string(),
            r#ref: ref_name.to_string(),
            message: e.to_string(),
            hint: Some("Make sure git is installed and on PATH".to_string()),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(Error::GitClone {
            url: url.to_string(),
            r#ref: ref_name.to_string(),
            hint: clone_hint(&stderr),
            message: stderr,
        });
    }

    Ok(())
}

/// Suggest a fix for common clone failures.
fn clone_hint(stderr: &str) -> Option<String> {
    if stderr.contains("Authentication failed")
        || stderr.contains("Permission denied")
        || stderr.contains("Could not read from remote repository")
    {
        Some(
            "Make sure you have access to the template repository \
             (SSH key in ssh-agent, git credentials or a personal access token)"
                .to_string(),
        )
    } else if stderr.contains("Remote branch") && stderr.contains("not found") {
        Some("Check the template branch name (--template-branch)".to_string())
    } else if stderr.contains("Could not resolve host") {
        Some("Check your network connection".to_string())
    } else {
        None
    }
}

/// Run `git -C <dir> <args>` and return its stdout.
fn run(dir: &Path, args: &[&str]) -> Result<String> {
    let output: Output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .map_err(|e| Error::GitCommand {
            command: args.join(" "),
            dir: dir.to_path_buf(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(Error::GitCommand {
            command: args.join(" "),
            dir: dir.to_path_buf(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Initialize a repository in `dir`. Safe to call on an existing repository.
pub fn init(dir: &Path) -> Result<()> {
    run(dir, &["init", "--quiet"]).map(|_| ())
}

/// Names of the remotes configured in `dir`.
pub fn list_remotes(dir: &Path) -> Result<Vec<String>> {
    let stdout = run(dir, &["remote"])?;
    Ok(parse_remote_names(&stdout))
}

fn parse_remote_names(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Remove the remote called `name`.
pub fn remove_remote(dir: &Path, name: &str) -> Result<()> {
    run(dir, &["remote", "remove", name]).map(|_| ())
}

/// Add a remote called `name` pointing at `url`.
pub fn add_remote(dir: &Path, name: &str, url: &str) -> Result<()> {
    run(dir, &["remote", "add", name, url]).map(|_| ())
}

/// URL of the remote called `name`.
pub fn remote_url(dir: &Path, name: &str) -> Result<String> {
    run(dir, &["remote", "get-url", name]).map(|stdout| stdout.trim().to_string())
}
