//! # Project Request Model
//!
//! This module defines the data that drives a scaffolding run.
//!
//! ## Key Components
//!
//! - **`ProjectRequest`**: The validated, immutable input of the pipeline:
//!   project name, package manager, remote URL and the environment
//!   parameters used by the rewriter.
//!
//! - **`ProjectAnswers`**: The partially-filled form of the same data, as read
//!   from an answers file or collected from CLI flags. Missing answers are
//!   filled in by the interactive prompts of the `create` command.
//!
//! - **`PackageManager`**: The closed set of supported package managers, each
//!   mapping to a fixed install/dev command pair.
//!
//! - **`TemplateSource`**: Where the template is cloned from.

use std::fmt;
use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::{Error, Result};

/// Supported package managers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
}

impl PackageManager {
    /// All variants, in prompt order.
    pub const ALL: [PackageManager; 3] =
        [PackageManager::Npm, PackageManager::Yarn, PackageManager::Pnpm];

    /// Executable name
    pub fn program(self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
        }
    }

    /// Arguments of the quiet dependency install.
    pub fn install_args(self) -> &'static [&'static str] {
        match self {
            PackageManager::Npm => &["install", "--loglevel=warn"],
            PackageManager::Yarn => &["install", "--silent"],
            PackageManager::Pnpm => &["install", "--reporter=silent"],
        }
    }

    /// Arguments that start the development server.
    pub fn dev_args(self) -> &'static [&'static str] {
        match self {
            PackageManager::Npm => &["run", "dev"],
            PackageManager::Yarn | PackageManager::Pnpm => &["dev"],
        }
    }

    /// The install command as a user would type it.
    pub fn install_command(self) -> String {
        command_line(self.program(), self.install_args())
    }

    /// The dev-server command as a user would type it.
    pub fn dev_command(self) -> String {
        command_line(self.program(), self.dev_args())
    }
}

fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

/// Parameters substituted into the generated environment files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvParams {
    /// Value of `ISI_DOCUMENTO_SECTOR`
    pub documento_sector: String,
    /// Value of `ISI_API_URL` in the local environment file
    pub api_url: String,
    /// Value of `APP_ENV` in the local environment file
    pub app_env: String,
}

impl Default for EnvParams {
    fn default() -> Self {
        Self {
            documento_sector: String::new(),
            api_url: String::new(),
            app_env: defaults::APP_ENV.to_string(),
        }
    }
}

/// A validated request to scaffold one project
#[derive(Debug, Clone)]
pub struct ProjectRequest {
    name: String,
    package_manager: PackageManager,
    remote_url: String,
    params: EnvParams,
}

impl ProjectRequest {
    /// Build a request, rejecting names that are not a single directory name.
    pub fn new(
        name: impl Into<String>,
        package_manager: PackageManager,
        remote_url: impl Into<String>,
        params: EnvParams,
    ) -> Result<Self> {
        let name = name.into();
        validate_project_name(&name)?;
        Ok(Self {
            name,
            package_manager,
            remote_url: remote_url.into().trim().to_string(),
            params,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn package_manager(&self) -> PackageManager {
        self.package_manager
    }

    pub fn remote_url(&self) -> &str {
        &self.remote_url
    }

    pub fn params(&self) -> &EnvParams {
        &self.params
    }

    /// The destination tree for this request under `working_root`.
    pub fn destination(&self, working_root: &Path) -> std::path::PathBuf {
        working_root.join(&self.name)
    }
}

/// Check that `name` can be used as a new directory directly under the
/// working root.
pub fn validate_project_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidProjectName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.trim().is_empty() {
        return Err(invalid("name must not be empty"));
    }
    if name.trim() != name {
        return Err(invalid("name must not start or end with whitespace"));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(invalid("name must not contain path separators"));
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(invalid("name must be a single directory name")),
    }
}

/// Answers that may be supplied ahead of time instead of interactively
///
/// Loaded from a YAML file such as:
///
/// ```yaml
/// package_manager: pnpm
/// repo: git@github.com:acme/invoice.git
/// documento_sector: "10"
/// api_url: https://api.example.com
/// app_env: local
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectAnswers {
    pub package_manager: Option<PackageManager>,
    pub repo: Option<String>,
    pub documento_sector: Option<String>,
    pub api_url: Option<String>,
    pub app_env: Option<String>,
}

impl ProjectAnswers {
    /// Parse answers from YAML text.
    pub fn parse(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read answers from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Filesystem {
            message: format!("Failed to read answers file '{}': {}", path.display(), e),
        })?;
        Self::parse(&content)
    }

    /// Fill every unanswered field from `other`.
    pub fn or(self, other: ProjectAnswers) -> Self {
        Self {
            package_manager: self.package_manager.or(other.package_manager),
            repo: self.repo.or(other.repo),
            documento_sector: self.documento_sector.or(other.documento_sector),
            api_url: self.api_url.or(other.api_url),
            app_env: self.app_env.or(other.app_env),
        }
    }

    /// Whether every question has an answer.
    pub fn is_complete(&self) -> bool {
        self.package_manager.is_some()
            && self.repo.is_some()
            && self.documento_sector.is_some()
            && self.api_url.is_some()
            && self.app_env.is_some()
    }

    /// Turn the answers into a request, using defaults for anything missing.
    pub fn into_request(self, name: &str) -> Result<ProjectRequest> {
        let params = EnvParams {
            documento_sector: self.documento_sector.unwrap_or_default(),
            api_url: self.api_url.unwrap_or_default(),
            app_env: self
                .app_env
                .filter(|env| !env.trim().is_empty())
                .unwrap_or_else(|| defaults::APP_ENV.to_string()),
        };
        ProjectRequest::new(
            name,
            self.package_manager.unwrap_or(PackageManager::Npm),
            self.repo.unwrap_or_default(),
            params,
        )
    }
}

/// Location of the template repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSource {
    /// Git URL (or local path) to clone
    pub url: String,
    /// Branch or tag to check out
    pub branch: String,
    /// Overlay archive file name, relative to the template root
    pub archive_name: String,
}

impl TemplateSource {
    pub fn new(url: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            branch: branch.into(),
            archive_name: defaults::OVERLAY_ARCHIVE.to_string(),
        }
    }
}

impl Default for TemplateSource {
    fn default() -> Self {
        Self::new(defaults::TEMPLATE_URL, defaults::TEMPLATE_BRANCH)
    }
}
