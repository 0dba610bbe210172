//! VCS Bootstrap
//!
//! Initializes a repository in the new project and points its `origin`
//! remote at the user's repository. Initialization failures are fatal;
//! failures while wiring the remote only produce a [`Warning`].

use std::path::Path;

use log::{info, warn};

use super::Warning;
use crate::defaults::REMOTE_NAME;
use crate::error::Result;
use crate::repository::GitOperations;

/// Execute the VCS bootstrap stage.
///
/// Returns the warning raised while configuring the remote, if any.
pub fn execute(
    git: &dyn GitOperations,
    destination: &Path,
    remote_url: &str,
) -> Result<Option<Warning>> {
    git.init(destination)?;
    info!("Initialized Git repository in {}", destination.display());

    if remote_url.trim().is_empty() {
        let warning = Warning::RemoteConfig {
            url: String::new(),
            message: "no remote URL given".to_string(),
        };
        warn!("{}", warning);
        return Ok(Some(warning));
    }

    match configure_remote(git, destination, remote_url) {
        Ok(()) => {
            info!("Remote '{}' set to {}", REMOTE_NAME, remote_url);
            Ok(None)
        }
        Err(e) => {
            let warning = Warning::RemoteConfig {
                url: remote_url.to_string(),
                message: e.to_string(),
            };
            warn!("{}", warning);
            Ok(Some(warning))
        }
    }
}

/// Replace any existing `origin` with one pointing at `remote_url`.
fn configure_remote(git: &dyn GitOperations, destination: &Path, remote_url: &str) -> Result<()> {
    let remotes = git.list_remotes(destination)?;
    if remotes.iter().any(|name| name == REMOTE_NAME) {
        git.remove_remote(destination, REMOTE_NAME)?;
    }
    git.add_remote(destination, REMOTE_NAME, remote_url)
}
