//! Cleanup
//!
//! The template's own documentation does not belong in a new project. This
//! stage removes every Markdown file at the project root, makes sure the
//! `dist-zip/` output directory exists, and writes a README generated for the
//! project.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::config::{PackageManager, ProjectRequest};
use crate::defaults::DIST_ZIP_DIR;
use crate::error::{Error, Result};

/// Extension of the documentation files removed from the root.
const DOC_EXTENSION: &str = ".md";

/// Name of the generated summary file.
pub const README: &str = "README.md";

/// Render the README of a new project.
pub fn render_readme(project_name: &str, package_manager: PackageManager) -> String {
    format!(
        r#"# {name}

This project was generated from the ISI.INVOICE template.

## Configuration

Make sure the following files hold the right settings:

- .env
- .env.production

## Available scripts

### Development

```
{pm} run dev
```

### Production

```
{pm} run build
```

### Other commands

See `package.json` for the remaining scripts.
"#,
        name = project_name,
        pm = package_manager
    )
}

/// Execute the cleanup stage.
///
/// Returns the documentation files that were removed.
pub fn execute(destination: &Path, request: &ProjectRequest) -> Result<Vec<PathBuf>> {
    let removed = remove_root_docs(destination)?;

    let dist = destination.join(DIST_ZIP_DIR);
    fs::create_dir_all(&dist).map_err(|e| Error::Filesystem {
        message: format!("Failed to create directory '{}': {}", dist.display(), e),
    })?;

    let readme = destination.join(README);
    fs::write(
        &readme,
        render_readme(request.name(), request.package_manager()),
    )
    .map_err(|e| Error::Filesystem {
        message: format!("Failed to write file '{}': {}", readme.display(), e),
    })?;
    info!("Wrote {}", readme.display());

    Ok(removed)
}

/// Delete every entry directly under `root` whose name ends in `.md`.
///
/// Links are removed without following them and directories are removed
/// with their contents.
fn remove_root_docs(root: &Path) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let is_doc = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(DOC_EXTENSION));
        if !is_doc {
            continue;
        }
        let path = entry.path();
        let is_dir = fs::symlink_metadata(&path)?.file_type().is_dir();
        let result = if is_dir {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        result.map_err(|e| Error::Filesystem {
            message: format!("Failed to remove '{}': {}", path.display(), e),
        })?;
        debug!("Removed {}", path.display());
        removed.push(path);
    }
    removed.sort();
    Ok(removed)
}
