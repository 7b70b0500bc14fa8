//! Operation: check a prepared tree before uploading it.

use std::path::Path;

use stagehand_artifacts::sidecar::verify_tree;
use stagehand_util::errors::StagehandError;
use stagehand_util::progress::{status, status_warn};

/// Fail if any data file under `dir` lacks a sidecar or has a stale checksum.
pub fn verify(dir: &Path) -> miette::Result<()> {
    if !dir.is_dir() {
        return Err(StagehandError::Generic {
            message: format!("{} is not a directory", dir.display()),
        }
        .into());
    }

    let issues = verify_tree(dir)?;
    if issues.is_empty() {
        status("Verified", &dir.display().to_string());
        return Ok(());
    }
    for issue in &issues {
        status_warn("Invalid", &issue.to_string());
    }
    Err(StagehandError::Generic {
        message: format!("{} problem(s) found in {}", issues.len(), dir.display()),
    }
    .into())
}
