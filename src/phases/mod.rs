//! Implementation of the stages of the scaffolding pipeline.
//!
//! ## Overview
//!
//! A project is materialized in five strictly sequential stages:
//! 1. Precondition Check - The destination must not exist yet
//! 2. VCS Bootstrap - `git init` and wire the `origin` remote
//! 3. Template Acquisition - Clone the template into a scratch directory,
//!    copy it without overwriting, then apply the overlay archive
//! 4. File Rewrite - Generate the environment files and patch `index.html`
//!    and the main layout
//! 5. Cleanup - Drop the template's Markdown files and write a fresh README
//!
//! Only a failing precondition or a failing clone aborts the pipeline. Every
//! other recoverable condition is recorded as a [`Warning`] in the
//! [`ScaffoldReport`].

use std::fmt;
use std::path::PathBuf;

use crate::archive::ExtractSummary;
use crate::filesystem::MergeSummary;
use crate::rewrite::{RewriteOutcome, RewriteTarget};

// Stage modules
pub mod acquisition;
pub mod bootstrap;
pub mod cleanup;
pub mod customize;
pub mod orchestrator;

/// A stage of the pipeline, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    PreconditionCheck,
    VcsBootstrap,
    TemplateAcquisition,
    FileRewrite,
    Cleanup,
}

impl Stage {
    /// Short progress message for this stage.
    pub fn description(self) -> &'static str {
        match self {
            Stage::PreconditionCheck => "Checking destination",
            Stage::VcsBootstrap => "Initializing the Git repository",
            Stage::TemplateAcquisition => "Fetching the project template",
            Stage::FileRewrite => "Customizing project files",
            Stage::Cleanup => "Writing README",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A recoverable problem; the pipeline carried on after it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The `origin` remote could not be configured
    RemoteConfig { url: String, message: String },
    /// The template has no overlay archive; only the directory copy was used
    ArchiveMissing { path: PathBuf },
    /// Archive entries pointing outside the project were ignored
    UnsafeArchiveEntries { count: usize },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::RemoteConfig { url, message } if url.is_empty() => {
                write!(f, "Remote repository not configured: {}", message)
            }
            Warning::RemoteConfig { url, message } => {
                write!(f, "Could not add remote repository {}: {}", url, message)
            }
            Warning::ArchiveMissing { path } => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                write!(f, "{} not found in the template repository", name)
            }
            Warning::UnsafeArchiveEntries { count } => {
                write!(f, "Ignored {} archive entries outside the project", count)
            }
        }
    }
}

/// Outcome of a successful pipeline run
#[derive(Debug, Clone, Default)]
pub struct ScaffoldReport {
    /// The project directory that was created
    pub destination: PathBuf,
    /// Recoverable problems, in the order they occurred
    pub warnings: Vec<Warning>,
    /// Base copy counts
    pub merge: MergeSummary,
    /// Overlay counts, if the archive was present
    pub overlay: Option<ExtractSummary>,
    /// What happened to each rewrite target
    pub rewrites: Vec<(RewriteTarget, RewriteOutcome)>,
    /// Template documentation files removed from the project root
    pub removed_docs: Vec<PathBuf>,
}

impl ScaffoldReport {
    /// Outcome recorded for `target`, if it was processed.
    pub fn outcome(&self, target: RewriteTarget) -> Option<RewriteOutcome> {
        self.rewrites
            .iter()
            .find(|(t, _)| *t == target)
            .map(|(_, outcome)| *outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display() {
        let warning = Warning::ArchiveMissing {
            path: PathBuf::from("/tmp/scratch/template/isiTemplate.zip"),
        };
        assert_eq!(
            warning.to_string(),
            "isiTemplate.zip not found in the template repository"
        );

        let warning = Warning::RemoteConfig {
            url: "bad url".to_string(),
            message: "invalid".to_string(),
        };
        assert!(warning.to_string().contains("bad url"));

        let warning = Warning::RemoteConfig {
            url: String::new(),
            message: "no remote URL given".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "Remote repository not configured: no remote URL given"
        );
    }

    #[test]
    fn test_report_outcome_lookup() {
        let report = ScaffoldReport {
            rewrites: vec![(RewriteTarget::IndexHtml, RewriteOutcome::Skipped)],
            ..Default::default()
        };
        assert_eq!(
            report.outcome(RewriteTarget::IndexHtml),
            Some(RewriteOutcome::Skipped)
        );
        assert_eq!(report.outcome(RewriteTarget::Layout), None);
    }
}
