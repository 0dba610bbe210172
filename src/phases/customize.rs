//! File Rewrite
//!
//! Applies every [`RewriteTarget`] once, in order, and records the outcome.

use std::path::Path;

use log::{debug, info};

use crate::config::ProjectRequest;
use crate::error::Result;
use crate::rewrite::{RewriteOutcome, RewriteTarget};

/// Execute the file rewrite stage.
pub fn execute(
    destination: &Path,
    request: &ProjectRequest,
) -> Result<Vec<(RewriteTarget, RewriteOutcome)>> {
    let mut outcomes = Vec::with_capacity(RewriteTarget::ALL.len());
    for target in RewriteTarget::ALL {
        let outcome = target.apply(destination, request)?;
        match outcome {
            RewriteOutcome::Skipped => debug!("{} not in template, skipped", target),
            RewriteOutcome::Unchanged => debug!("{} already up to date", target),
            RewriteOutcome::Generated | RewriteOutcome::Rewritten => {
                info!("Updated {}", target)
            }
        }
        outcomes.push((target, outcome));
    }
    Ok(outcomes)
}
