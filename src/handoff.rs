//! Post-scaffold handoff to the package manager.
//!
//! Once the project directory is materialized, dependencies are installed,
//! an editor is opened, and the development server is started. Each command
//! runs with the project as its working directory; the process's own current
//! directory is left alone.
//!
//! Only the install step has a failure contract: a non-zero exit stops the
//! handoff with [`Error::Install`] before the dev server is launched.

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, ExitStatus};

use log::{info, warn};

use crate::config::PackageManager;
use crate::error::{Error, Result};

fn spawn_error(program: &str, e: std::io::Error) -> Error {
    Error::Spawn {
        program: program.to_string(),
        message: e.to_string(),
    }
}

/// Install dependencies with `package_manager`, capturing its output.
pub fn install(package_manager: PackageManager, project_dir: &Path) -> Result<()> {
    run_install(
        package_manager.program(),
        package_manager.install_args(),
        project_dir,
    )
}

fn run_install<S: AsRef<OsStr>>(program: &str, args: &[S], project_dir: &Path) -> Result<()> {
    let command = std::iter::once(program.to_string())
        .chain(args.iter().map(|a| a.as_ref().to_string_lossy().into_owned()))
        .collect::<Vec<_>>()
        .join(" ");
    info!("Running `{}` in {}", command, project_dir.display());

    let output = Command::new(program)
        .args(args)
        .current_dir(project_dir)
        .output()
        .map_err(|e| spawn_error(program, e))?;

    if !output.status.success() {
        return Err(Error::Install {
            command,
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}

/// Open `editor` on the project. Failures are logged and ignored.
pub fn open_editor(editor: &str, project_dir: &Path) -> bool {
    let mut parts = editor.split_whitespace();
    let Some(program) = parts.next() else {
        return false;
    };
    match Command::new(program)
        .args(parts)
        .arg(".")
        .current_dir(project_dir)
        .status()
    {
        Ok(status) if status.success() => true,
        Ok(status) => {
            warn!("Editor `{}` exited with {}", editor, status);
            false
        }
        Err(e) => {
            warn!("Could not open editor `{}`: {}", editor, e);
            false
        }
    }
}

/// Start the development server and block until it exits.
pub fn launch_dev_server(package_manager: PackageManager, project_dir: &Path) -> Result<ExitStatus> {
    info!(
        "Running `{}` in {}",
        package_manager.dev_command(),
        project_dir.display()
    );
    Command::new(package_manager.program())
        .args(package_manager.dev_args())
        .current_dir(project_dir)
        .status()
        .map_err(|e| spawn_error(package_manager.program(), e))
}
