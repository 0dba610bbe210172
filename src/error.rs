//! # Error Handling
//!
//! This module defines the centralized error type for the `isi-create`
//! scaffolding pipeline. It uses the `thiserror` library to create an `Error`
//! enum covering every fatal failure mode, with descriptive messages.
//!
//! ## Severity
//!
//! Only conditions that stop the pipeline are represented here:
//!
//! - **Precondition failures** (`DestinationExists`, `InvalidProjectName`) are
//!   raised before anything is written to disk.
//! - **Acquisition failures** (`GitClone`) abort after version control has
//!   been bootstrapped; nothing is rolled back.
//! - **Install failures** (`Install`) stop the post-scaffold handoff before the
//!   development server is launched.
//!
//! Recoverable conditions (remote wiring, a missing overlay archive) are not
//! errors. They are collected as [`crate::phases::Warning`] values in the
//! final report instead.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for isi-create operations
#[derive(Error, Debug)]
pub enum Error {
    /// The destination directory already exists.
    #[error("Destination already exists: {}. Choose another name or remove the existing directory", path.display())]
    DestinationExists { path: PathBuf },

    /// The requested project name cannot be used as a directory name.
    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    /// An error occurred while cloning the template repository.
    ///
    /// Includes the repository URL, ref (branch/tag), error message, and an
    /// optional hint for resolution.
    #[error("Git clone error for {url}@{r#ref}: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    GitClone {
        url: String,
        r#ref: String,
        message: String,
        /// Optional hint for how to resolve the clone issue
        hint: Option<String>,
    },

    /// An error occurred while executing a Git command in a local repository.
    #[error("Git command failed in {}: {command} - {stderr}", dir.display())]
    GitCommand {
        command: String,
        dir: PathBuf,
        stderr: String,
    },

    /// The overlay archive does not exist at the expected path.
    #[error("Overlay archive not found: {}", path.display())]
    ArchiveNotFound { path: PathBuf },

    /// The overlay archive could not be read.
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A filesystem operation failed on the host filesystem.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// The package manager install step exited unsuccessfully.
    #[error("Dependency installation failed: `{command}` exited with {}{}", code.map(|c| c.to_string()).unwrap_or_else(|| "a signal".to_string()), if stderr.is_empty() { String::new() } else { format!("\n{}", stderr) })]
    Install {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// An external program could not be started.
    #[error("Failed to run `{program}`: {message}")]
    Spawn { program: String, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A directory walk error, wrapped from `walkdir::Error`.
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

impl Error {
    /// Whether this error was raised before the destination was touched.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::DestinationExists { .. } | Error::InvalidProjectName { .. }
        )
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
