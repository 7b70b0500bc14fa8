//! Operation: prepare, stage and close every selected version, one
//! staging repository per version.

use stagehand_artifacts::prepare::validate_group;
use stagehand_core::settings::Settings;
use stagehand_util::errors::StagehandError;
use stagehand_util::progress::{status, status_info};

use crate::ops_prepare::{PrepareOptions, Toolbox};

#[derive(Debug, Clone)]
pub struct PublishOptions {
    pub prepare: PrepareOptions,
    pub description: String,
    /// Wait for each close and release the repository.
    pub release: bool,
    pub drop_after_release: bool,
}

/// Returns `(version, repository id)` pairs in processing order.
///
/// Stops at the first failure; repositories created before it are left as they are.
pub async fn publish(
    settings: &Settings,
    options: &PublishOptions,
) -> miette::Result<Vec<(String, String)>> {
    validate_group(&options.prepare.group)?;
    let versions = options.prepare.selected_versions()?;
    if versions.is_empty() {
        return Err(StagehandError::Generic {
            message: format!(
                "No versions to publish under {}",
                options.prepare.input.display()
            ),
        }
        .into());
    }

    let toolbox = Toolbox::from_settings(settings)?;
    let orchestrator = crate::connect(settings)?;
    let profile_id =
        crate::select_profile(&orchestrator, settings.nexus.profile_id.as_deref()).await?;

    let mut staged = Vec::with_capacity(versions.len());
    for version in versions {
        status("Preparing", &format!("version {version}"));
        let request = options.prepare.request(Some(vec![version.clone()]));
        let report = toolbox.preparer().prepare(&request)?;
        tracing::info!(
            "{version}: {} files, {} new signatures",
            report.files_written(),
            report.signatures_generated()
        );

        let repository_id = orchestrator
            .create(&profile_id, &options.description)
            .await?;
        let count =
            crate::upload_with_progress(&orchestrator, &repository_id, &options.prepare.scratch)
                .await?;
        status(
            "Uploaded",
            &format!("{count} files of {version} to {repository_id}"),
        );

        orchestrator.close(&repository_id).await?;
        status("Closing", &repository_id);

        if options.release {
            crate::wait_with_spinner(&orchestrator, settings, &repository_id).await?;
            orchestrator
                .release(&repository_id, options.drop_after_release)
                .await?;
            status("Released", &repository_id);
        }
        staged.push((version, repository_id));
    }

    status_info("Published", "versions:");
    for (version, repository_id) in &staged {
        println!("{version}: {repository_id}");
    }
    Ok(staged)
}
