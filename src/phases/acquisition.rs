//! Template Acquisition
//!
//! Clones the template into a scratch directory, lays its tree down in the
//! destination without overwriting anything, then applies the overlay archive
//! on top. The scratch directory is a [`tempfile::TempDir`], so it is removed
//! on every exit path.
//!
//! A failing clone is fatal. A missing overlay archive is only a warning: the
//! plain directory copy is still a usable project.

use std::path::Path;

use log::{info, warn};

use super::Warning;
use crate::archive::{self, ExtractSummary};
use crate::config::TemplateSource;
use crate::defaults::{EXCLUDED_PREFIXES, SCRATCH_PREFIX};
use crate::error::{Error, Result};
use crate::filesystem::{self, MergeSummary};
use crate::repository::GitOperations;

/// What the acquisition stage laid down
#[derive(Debug, Default, Clone)]
pub struct Acquisition {
    pub merge: MergeSummary,
    pub overlay: Option<ExtractSummary>,
    pub warnings: Vec<Warning>,
}

/// Execute the template acquisition stage.
///
/// `scratch_root` selects where the scratch directory is created; `None`
/// uses the system temporary directory.
pub fn execute(
    git: &dyn GitOperations,
    source: &TemplateSource,
    destination: &Path,
    scratch_root: Option<&Path>,
) -> Result<Acquisition> {
    let builder = {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX);
        builder
    };
    let scratch = match scratch_root {
        Some(root) => builder.tempdir_in(root),
        None => builder.tempdir(),
    }
    .map_err(|e| Error::Filesystem {
        message: format!("Failed to create scratch directory: {}", e),
    })?;
    let template_dir = scratch.path().join("template");

    info!("Cloning {}@{}", source.url, source.branch);
    git.clone_shallow(&source.url, &source.branch, &template_dir)?;

    let result = lay_down(&template_dir, source, destination);

    if let Err(e) = scratch.close() {
        warn!("Failed to remove scratch directory: {}", e);
    }
    result
}

fn lay_down(template_dir: &Path, source: &TemplateSource, destination: &Path) -> Result<Acquisition> {
    let mut acquisition = Acquisition {
        merge: filesystem::merge_tree(template_dir, destination, EXCLUDED_PREFIXES)?,
        ..Default::default()
    };
    info!(
        "Copied {} template files ({} already present)",
        acquisition.merge.copied, acquisition.merge.skipped_existing
    );

    let archive_path = template_dir.join(&source.archive_name);
    match archive::extract_overlay(&archive_path, destination) {
        Ok(summary) => {
            info!(
                "Extracted {}: {} files, {} directories",
                source.archive_name, summary.files, summary.directories
            );
            if summary.skipped_unsafe > 0 {
                acquisition.warnings.push(Warning::UnsafeArchiveEntries {
                    count: summary.skipped_unsafe,
                });
            }
            acquisition.overlay = Some(summary);
        }
        Err(Error::ArchiveNotFound { path }) => {
            let warning = Warning::ArchiveMissing { path };
            warn!("{}", warning);
            acquisition.warnings.push(warning);
        }
        Err(e) => return Err(e),
    }

    Ok(acquisition)
}
