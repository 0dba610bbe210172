//! Host filesystem helpers for laying down a template tree.
//!
//! [`merge_tree`] performs the base copy of a template: it never replaces a
//! file that already exists at the destination, so the first writer of a path
//! wins. Overwriting is left to the overlay archive (see [`crate::archive`]).

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Counts reported by [`merge_tree`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeSummary {
    /// Files (and links) created at the destination
    pub copied: usize,
    /// Files left alone because the destination already had them
    pub skipped_existing: usize,
}

/// Whether the text of `relative` begins with one of the `excluded` prefixes.
///
/// This is a plain string test: `.git` excludes `.git/HEAD` as well as
/// `.gitignore` and `.github/`. Only paths starting at the template root can
/// match.
pub fn is_excluded(relative: &Path, excluded: &[&str]) -> bool {
    let relative = relative.to_string_lossy();
    excluded
        .iter()
        .any(|prefix| !prefix.is_empty() && relative.starts_with(prefix))
}

/// Copy every path under `source` into `destination` without overwriting.
///
/// Paths under an `excluded` prefix are skipped with their whole subtree.
/// Directories are created as needed. Any filesystem error is returned.
pub fn merge_tree(source: &Path, destination: &Path, excluded: &[&str]) -> Result<MergeSummary> {
    let mut summary = MergeSummary::default();

    fs::create_dir_all(destination).map_err(|e| Error::Filesystem {
        message: format!(
            "Failed to create directory '{}': {}",
            destination.display(),
            e
        ),
    })?;

    let walker = WalkDir::new(source)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry
                .path()
                .strip_prefix(source)
                .map(|relative| !is_excluded(relative, excluded))
                .unwrap_or(true)
        });

    for entry in walker {
        let entry = entry?;
        let relative = relative_to(source, entry.path())?;
        let target = destination.join(&relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target).map_err(|e| Error::Filesystem {
                message: format!("Failed to create directory '{}': {}", target.display(), e),
            })?;
            continue;
        }

        if target.symlink_metadata().is_ok() {
            debug!("Keeping existing {}", relative.display());
            summary.skipped_existing += 1;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| Error::Filesystem {
                message: format!(
                    "Failed to copy '{}' to '{}': {}",
                    entry.path().display(),
                    target.display(),
                    e
                ),
            })?;
        }
        summary.copied += 1;
    }

    Ok(summary)
}

fn relative_to(base: &Path, path: &Path) -> Result<PathBuf> {
    path.strip_prefix(base)
        .map(Path::to_path_buf)
        .map_err(|_| Error::Filesystem {
            message: format!(
                "Path '{}' is outside of '{}'",
                path.display(),
                base.display()
            ),
        })
}

#[cfg(unix)]
fn copy_symlink(link: &Path, target: &Path) -> Result<()> {
    let points_to = fs::read_link(link)?;
    std::os::unix::fs::symlink(points_to, target)?;
    Ok(())
}

#[cfg(not(unix))]
fn copy_symlink(link: &Path, target: &Path) -> Result<()> {
    fs::copy(link, target)?;
    Ok(())
}
