//! Overlay archive extraction.
//!
//! The template ships an archive whose entries are applied on top of the
//! base copy. Unlike [`crate::filesystem::merge_tree`], extraction always
//! overwrites, which gives the archive the final say over any path that both
//! deliver.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use zip::ZipArchive;

use crate::error::{Error, Result};

/// Counts reported by [`extract_overlay`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Directory entries ensured
    pub directories: usize,
    /// File entries written
    pub files: usize,
    /// Entries whose names would escape the destination
    pub skipped_unsafe: usize,
}

/// Apply every entry of the zip archive at `archive_path` onto `destination`.
///
/// Returns [`Error::ArchiveNotFound`] when the archive does not exist. Entries
/// are applied in archive order, so the last entry for a path wins.
pub fn extract_overlay(archive_path: &Path, destination: &Path) -> Result<ExtractSummary> {
    if !archive_path.is_file() {
        return Err(Error::ArchiveNotFound {
            path: archive_path.to_path_buf(),
        });
    }

    let file = fs::File::open(archive_path)?;
    let mut archive = ZipArchive::new(io::BufReader::new(file))?;
    let mut summary = ExtractSummary::default();

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;

        let relative: PathBuf = match entry.enclosed_name() {
            Some(path) => path.to_path_buf(),
            None => {
                warn!("Skipping archive entry outside the project: {}", entry.name());
                summary.skipped_unsafe += 1;
                continue;
            }
        };
        let target = destination.join(&relative);

        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(|e| Error::Filesystem {
                message: format!("Failed to create directory '{}': {}", target.display(), e),
            })?;
            debug!("Directory ensured: {}", relative.display());
            summary.directories += 1;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = fs::File::create(&target).map_err(|e| Error::Filesystem {
            message: format!("Failed to write file '{}': {}", target.display(), e),
        })?;
        io::copy(&mut entry, &mut out)?;
        debug!("File written: {}", relative.display());
        summary.files += 1;
    }

    Ok(summary)
}
