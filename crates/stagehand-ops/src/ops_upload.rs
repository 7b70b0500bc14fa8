//! Operation: create a staging repository and upload a directory into it.

use std::path::Path;

use stagehand_core::settings::Settings;
use stagehand_util::errors::StagehandError;
use stagehand_util::progress::status;

/// Upload every file under `dir` to a new repository and return its id.
///
/// `dir` holds a Maven layout such as `com/example/lib/1.0/lib-1.0.jar`.
pub async fn upload(settings: &Settings, dir: &Path, description: &str) -> miette::Result<String> {
    if !dir.is_dir() {
        return Err(StagehandError::Generic {
            message: format!("{} is not a directory", dir.display()),
        }
        .into());
    }

    let orchestrator = crate::connect(settings)?;
    let profile_id =
        crate::select_profile(&orchestrator, settings.nexus.profile_id.as_deref()).await?;

    let repository_id = orchestrator.create(&profile_id, description).await?;
    status("Created", &format!("staging repository {repository_id}"));

    let count = crate::upload_with_progress(&orchestrator, &repository_id, dir).await?;
    status(
        "Uploaded",
        &format!("{count} files to staging repository '{repository_id}'"),
    );
    Ok(repository_id)
}
