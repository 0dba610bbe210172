//! Default values for isi-create.
//!
//! This module provides centralized default values used across commands and
//! pipeline stages, ensuring consistency and avoiding duplication.

/// Git URL of the ISI.INVOICE template repository.
///
/// Overridden by `--template-url` or the `ISI_TEMPLATE_URL` environment
/// variable.
pub const TEMPLATE_URL: &str = "https://github.com/integrate-bolivia/isi-template.git";

/// Branch of the template repository to clone.
pub const TEMPLATE_BRANCH: &str = "main";

/// File name of the overlay archive shipped inside the template repository.
pub const OVERLAY_ARCHIVE: &str = "isiTemplate.zip";

/// Template paths never copied into a new project.
pub const EXCLUDED_PREFIXES: &[&str] = &[".git", "node_modules"];

/// Deployment environment used when none is given.
pub const APP_ENV: &str = "local";

/// Name of the remote wired to the user's repository.
pub const REMOTE_NAME: &str = "origin";

/// Editor launched after a successful install.
pub const EDITOR: &str = "code";

/// Directory created at the project root for packaged builds.
pub const DIST_ZIP_DIR: &str = "dist-zip";

/// Prefix of the scratch directory that holds the cloned template.
pub const SCRATCH_PREFIX: &str = "isi-template-";
