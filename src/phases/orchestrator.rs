//! Orchestrator for the complete scaffolding run
//!
//! This module sequences all stages behind one entry point,
//! [`Scaffolder::run`]. Stages run strictly one after another; each one is
//! attempted exactly once and nothing is rolled back when a later stage
//! fails.

use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info};

use super::{acquisition, bootstrap, cleanup, customize, ScaffoldReport, Stage};
use crate::config::{ProjectRequest, TemplateSource};
use crate::error::{Error, Result};
use crate::repository::{DefaultGitOperations, GitOperations};

/// Runs the scaffolding pipeline for one template source
pub struct Scaffolder {
    git: Box<dyn GitOperations>,
    template: TemplateSource,
    scratch_root: Option<PathBuf>,
}

impl Scaffolder {
    /// Creates a `Scaffolder` that uses the system `git` command.
    pub fn new(template: TemplateSource) -> Self {
        Self::with_git_operations(Box::new(DefaultGitOperations), template)
    }

    /// Creates a `Scaffolder` with a custom `GitOperations` implementation.
    pub fn with_git_operations(git: Box<dyn GitOperations>, template: TemplateSource) -> Self {
        Self {
            git,
            template,
            scratch_root: None,
        }
    }

    /// Create scratch directories under `root` instead of the system
    /// temporary directory.
    pub fn scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    /// Materialize `request` as a new directory under `working_root`.
    pub fn run(&self, request: &ProjectRequest, working_root: &Path) -> Result<ScaffoldReport> {
        self.run_with_progress(request, working_root, |_| {})
    }

    /// Like [`Scaffolder::run`], calling `on_stage` as each stage starts.
    pub fn run_with_progress<F>(
        &self,
        request: &ProjectRequest,
        working_root: &Path,
        mut on_stage: F,
    ) -> Result<ScaffoldReport>
    where
        F: FnMut(Stage),
    {
        let destination = request.destination(working_root);
        let result = self.execute(request, &destination, &mut on_stage);
        if let Err(e) = &result {
            error!("Scaffolding {} aborted: {}", request.name(), e);
        }
        result
    }

    fn execute(
        &self,
        request: &ProjectRequest,
        destination: &Path,
        on_stage: &mut dyn FnMut(Stage),
    ) -> Result<ScaffoldReport> {
        let mut report = ScaffoldReport {
            destination: destination.to_path_buf(),
            ..Default::default()
        };

        enter(on_stage, Stage::PreconditionCheck);
        check_destination(destination)?;
        fs::create_dir(destination).map_err(|e| Error::Filesystem {
            message: format!(
                "Failed to create directory '{}': {}",
                destination.display(),
                e
            ),
        })?;

        enter(on_stage, Stage::VcsBootstrap);
        if let Some(warning) =
            bootstrap::execute(self.git.as_ref(), destination, request.remote_url())?
        {
            report.warnings.push(warning);
        }

        enter(on_stage, Stage::TemplateAcquisition);
        let acquired = acquisition::execute(
            self.git.as_ref(),
            &self.template,
            destination,
            self.scratch_root.as_deref(),
        )?;
        report.merge = acquired.merge;
        report.overlay = acquired.overlay;
        report.warnings.extend(acquired.warnings);

        enter(on_stage, Stage::FileRewrite);
        report.rewrites = customize::execute(destination, request)?;

        enter(on_stage, Stage::Cleanup);
        report.removed_docs = cleanup::execute(destination, request)?;

        info!(
            "Project {} created at {} ({} warnings)",
            request.name(),
            destination.display(),
            report.warnings.len()
        );
        Ok(report)
    }
}

fn enter(on_stage: &mut dyn FnMut(Stage), stage: Stage) {
    info!("{}", stage);
    on_stage(stage);
}

/// The destination must not exist in any form, including a dangling link.
fn check_destination(destination: &Path) -> Result<()> {
    if destination.symlink_metadata().is_ok() {
        return Err(Error::DestinationExists {
            path: destination.to_path_buf(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::test_support::write_zip;
    use crate::config::{EnvParams, PackageManager};
    use crate::phases::Warning;
    use crate::repository::mock::MockGitOperations;
    use crate::rewrite::{RewriteOutcome, RewriteTarget, LAYOUT_MARKER};
    use tempfile::TempDir;

    const INDEX_HTML: &str = r#"<!doctype html>
<html>
  <head>
    <meta name="description" content="Plantilla ISI" />
    <title>ISI Template</title>
  </head>
</html>
"#;

    const LAYOUT: &str = "const Layout1 = () => {\n  return (\n    <div className=\"layout\">\n    </div>\n  );\n};\n";

    fn acme_request() -> ProjectRequest {
        ProjectRequest::new(
            "acme-invoice",
            PackageManager::Npm,
            "https://example.com/r.git",
            EnvParams {
                documento_sector: "10".to_string(),
                api_url: "https://api.example.com".to_string(),
                app_env: "local".to_string(),
            },
        )
        .unwrap()
    }

    fn overlay_archive(entries: &[crate::archive::test_support::Entry<'_>]) -> Vec<u8> {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("isiTemplate.zip");
        write_zip(&path, entries);
        fs::read(path).unwrap()
    }

    fn scaffolder(git: &MockGitOperations, scratch: &Path) -> Scaffolder {
        Scaffolder::with_git_operations(
            Box::new(git.clone()),
            TemplateSource::new("https://example.com/isi-template.git", "main"),
        )
        .scratch_root(scratch)
    }

    #[test]
    fn test_end_to_end_acme_invoice() {
        let work = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        let archive = overlay_archive(&[("manifest.json", Some("{\"name\":\"overlay\"}"))]);
        let layout_path = RewriteTarget::Layout
            .relative_path()
            .to_string_lossy()
            .into_owned();
        let git = MockGitOperations::with_template(&[
            ("manifest.json", b"{\"name\":\"base\"}".as_slice()),
            ("index.html", INDEX_HTML.as_bytes()),
            (layout_path.as_str(), LAYOUT.as_bytes()),
            ("README.md", b"# ISI template".as_slice()),
            ("CONTRIBUTING.md", b"rules".as_slice()),
            ("isiTemplate.zip", archive.as_slice()),
        ]);

        let mut stages = Vec::new();
        let report = scaffolder(&git, scratch.path())
            .run_with_progress(&acme_request(), work.path(), |stage| stages.push(stage))
            .unwrap();

        let dest = work.path().join("acme-invoice");
        assert_eq!(report.destination, dest);
        assert_eq!(
            stages,
            vec![
                Stage::PreconditionCheck,
                Stage::VcsBootstrap,
                Stage::TemplateAcquisition,
                Stage::FileRewrite,
                Stage::Cleanup
            ]
        );
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);

        // Version control: a single origin remote
        assert!(dest.join(".git").is_dir());
        let remotes = git.remotes.lock().unwrap().clone();
        assert_eq!(remotes.len(), 1);
        assert_eq!(
            remotes.get("origin").map(String::as_str),
            Some("https://example.com/r.git")
        );

        // Overlay wins over the directory copy
        assert_eq!(
            fs::read_to_string(dest.join("manifest.json")).unwrap(),
            "{\"name\":\"overlay\"}"
        );

        let env = fs::read_to_string(dest.join(".env")).unwrap();
        assert!(env.contains("APP_ENV=local\n"));
        assert!(env.contains("ISI_API_URL=https://api.example.com\n"));
        assert!(env.contains("ISI_DOCUMENTO_SECTOR=10\n"));
        assert!(dest.join(".env.production").exists());

        let html = fs::read_to_string(dest.join("index.html")).unwrap();
        assert!(html.contains("<title>acme-invoice</title>"));
        assert!(html.contains(r#"content="acme-invoice""#));

        let layout = fs::read_to_string(dest.join(&layout_path)).unwrap();
        assert_eq!(layout.matches(LAYOUT_MARKER).count(), 1);
        assert_eq!(
            report.outcome(RewriteTarget::Layout),
            Some(RewriteOutcome::Rewritten)
        );

        // Only the generated README remains among root Markdown files
        let markdown: Vec<String> = fs::read_dir(&dest)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".md"))
            .collect();
        assert_eq!(markdown, vec!["README.md".to_string()]);
        let readme = fs::read_to_string(dest.join("README.md")).unwrap();
        assert!(readme.starts_with("# acme-invoice"));
        assert!(readme.contains("npm run dev"));
        assert_eq!(report.removed_docs.len(), 2);

        assert_eq!(fs::read_dir(scratch.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_existing_destination_aborts_without_mutation() {
        let work = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        let dest = work.path().join("acme-invoice");
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("keep.txt"), "mine").unwrap();
        let git = MockGitOperations::with_template(&[("index.html", INDEX_HTML.as_bytes())]);

        let result = scaffolder(&git, scratch.path()).run(&acme_request(), work.path());

        match result {
            Err(e @ Error::DestinationExists { .. }) => assert!(e.is_precondition()),
            other => panic!("expected DestinationExists, got {:?}", other),
        }
        assert!(git.calls().is_empty());
        let entries: Vec<_> = fs::read_dir(&dest).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(fs::read_to_string(dest.join("keep.txt")).unwrap(), "mine");
    }

    #[test]
    fn test_existing_file_at_destination_aborts() {
        let work = TempDir::new().unwrap();
        fs::write(work.path().join("acme-invoice"), "file").unwrap();
        let git = MockGitOperations::default();

        let result = Scaffolder::with_git_operations(Box::new(git.clone()), TemplateSource::default())
            .run(&acme_request(), work.path());

        assert!(matches!(result, Err(Error::DestinationExists { .. })));
        assert!(git.calls().is_empty());
    }

    #[test]
    fn test_clone_failure_leaves_only_bootstrap_state() {
        let work = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        let git = MockGitOperations::failing_clone("fatal: unable to access: Could not resolve host");

        let mut stages = Vec::new();
        let result = scaffolder(&git, scratch.path()).run_with_progress(
            &acme_request(),
            work.path(),
            |stage| stages.push(stage),
        );

        assert!(matches!(result, Err(Error::GitClone { .. })));
        assert_eq!(stages.last(), Some(&Stage::TemplateAcquisition));

        let dest = work.path().join("acme-invoice");
        let entries: Vec<String> = fs::read_dir(&dest)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(entries, vec![".git".to_string()]);
        assert!(!dest.join(".env").exists());
        assert!(!dest.join("README.md").exists());
        assert_eq!(fs::read_dir(scratch.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_recoverable_conditions_do_not_abort() {
        let work = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        let git = MockGitOperations {
            add_remote_error: Some("fatal: bad url".to_string()),
            ..MockGitOperations::with_template(&[("package.json", b"{}".as_slice())])
        };

        let report = scaffolder(&git, scratch.path())
            .run(&acme_request(), work.path())
            .unwrap();

        assert_eq!(report.warnings.len(), 2);
        assert!(matches!(report.warnings[0], Warning::RemoteConfig { .. }));
        assert!(matches!(report.warnings[1], Warning::ArchiveMissing { .. }));
        assert!(report.overlay.is_none());
        assert_eq!(
            report.outcome(RewriteTarget::IndexHtml),
            Some(RewriteOutcome::Skipped)
        );
        assert_eq!(
            report.outcome(RewriteTarget::Layout),
            Some(RewriteOutcome::Skipped)
        );
        let dest = work.path().join("acme-invoice");
        assert!(dest.join("package.json").exists());
        assert!(dest.join(".env").exists());
        assert!(dest.join("README.md").exists());
    }

    #[test]
    fn test_invalid_name_is_rejected_before_pipeline() {
        let result = ProjectRequest::new("../escape", PackageManager::Npm, "", EnvParams::default());
        assert!(matches!(result, Err(Error::InvalidProjectName { .. })));
    }
}
