//! Shared test utilities for the end-to-end tests.
//!
//! This module provides a working-directory fixture for running the
//! `isi-create` binary and a builder for local template repositories, so the
//! full pipeline can be exercised against real Git without network access.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     if !git_available() {
//!         return;
//!     }
//!     let template = TemplateRepo::standard();
//!     let fixture = TestFixture::new();
//!     fixture.create("acme-invoice", &template).assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::git_available;
    #[allow(unused_imports)]
    pub use super::templates;
    #[allow(unused_imports)]
    pub use super::TemplateRepo;
    pub use super::TestFixture;
}

/// File contents of the standard test template.
#[allow(dead_code)]
pub mod templates {
    pub const INDEX_HTML: &str = "<!doctype html>\n<html>\n  <head>\n    <title>ISI Template</title>\n  </head>\n  <body><div id=\"root\"></div></body>\n</html>\n";

    pub const LAYOUT: &str = "export default function Layout1() {\n  return (\n    <div className=\"layout\">\n      <Outlet />\n    </div>\n  );\n}\n";

    pub const LAYOUT_PATH: &str = "src/app/base/components/Template/MatxLayout/Layout1/Layout1.tsx";

    pub const PACKAGE_JSON_BASE: &str = "{ \"name\": \"isi-template\", \"version\": \"0.0.0\" }\n";

    pub const PACKAGE_JSON_OVERLAY: &str = "{ \"name\": \"isi-template\", \"version\": \"1.0.0\" }\n";
}

/// Whether a `git` executable can be run. Tests that need real Git return
/// early when it is missing.
#[allow(dead_code)]
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(["-c", "user.name=ISI Tests", "-c", "user.email=tests@example.com"])
        .args(args)
        .output()
        .expect("Failed to run git");
    assert!(
        status.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&status.stderr)
    );
}

/// A template repository committed on `main` in a temporary directory.
pub struct TemplateRepo {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TemplateRepo {
    /// Build a repository from `files` and an optional overlay archive.
    pub fn new(files: &[(&str, &str)], overlay: Option<&[(&str, &str)]>) -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        for (path, content) in files {
            temp_dir
                .child(path)
                .write_str(content)
                .expect("Failed to write template file");
        }
        if let Some(entries) = overlay {
            write_overlay(&temp_dir.path().join("isiTemplate.zip"), entries);
        }

        let root = temp_dir.path();
        git(root, &["init", "--quiet"]);
        git(root, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        git(root, &["add", "--all"]);
        git(root, &["commit", "--quiet", "-m", "template"]);
        Self { temp_dir }
    }

    /// The template used by most tests: base files, docs, and an overlay
    /// that carries the layout component and a newer `package.json`.
    pub fn standard() -> Self {
        Self::new(
            &[
                ("index.html", templates::INDEX_HTML),
                ("package.json", templates::PACKAGE_JSON_BASE),
                ("CHANGELOG.md", "# Changelog\n"),
                ("README.md", "# ISI Template\n"),
                (".gitignore", "node_modules\ndist\n"),
            ],
            Some(&[
                (templates::LAYOUT_PATH, templates::LAYOUT),
                ("package.json", templates::PACKAGE_JSON_OVERLAY),
            ]),
        )
    }

    /// A template without an overlay archive.
    pub fn without_overlay() -> Self {
        Self::new(
            &[
                ("index.html", templates::INDEX_HTML),
                ("package.json", templates::PACKAGE_JSON_BASE),
            ],
            None,
        )
    }

    /// `file://` URL that `git clone --depth=1` accepts.
    pub fn url(&self) -> String {
        format!("file://{}", self.temp_dir.path().display())
    }
}

fn write_overlay(path: &Path, entries: &[(&str, &str)]) {
    let file = std::fs::File::create(path).expect("Failed to create archive");
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::FileOptions::default();
    for (name, content) in entries {
        zip.start_file(*name, options).expect("Failed to start entry");
        zip.write_all(content.as_bytes())
            .expect("Failed to write entry");
    }
    zip.finish().expect("Failed to finish archive");
}

/// A temporary working directory in which projects are created.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path of a project created in this fixture.
    pub fn project(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Create a child path in the temp directory.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// A command running in this fixture's directory, isolated from the
    /// caller's `ISI_*` and logging environment.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("isi-create");
        cmd.current_dir(self.path())
            .env_remove("ISI_TEMPLATE_URL")
            .env_remove("ISI_TEMPLATE_BRANCH")
            .env_remove("ISI_CREATE_ANSWERS")
            .env_remove("ISI_EDITOR")
            .env_remove("RUST_LOG")
            .arg("--color")
            .arg("never");
        cmd
    }

    /// `create <name>` against `template`, without prompts or handoff.
    pub fn create(&self, name: &str, template: &TemplateRepo) -> assert_cmd::Command {
        let mut cmd = self.command();
        cmd.arg("create")
            .arg(name)
            .arg("--no-input")
            .arg("--skip-install")
            .arg("--template-url")
            .arg(template.url());
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_fixture_with_file() {
        let fixture = TestFixture::new().with_file("test.txt", "hello");
        assert!(fixture.path().join("test.txt").exists());
    }

    #[test]
    fn test_template_repo_has_overlay() {
        if !git_available() {
            return;
        }
        let template = TemplateRepo::standard();
        assert!(template.url().starts_with("file://"));
        assert!(template.temp_dir.path().join("isiTemplate.zip").is_file());
        assert!(template.temp_dir.path().join(".git").is_dir());
    }
}
