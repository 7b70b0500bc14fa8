//! Operation: request validation and closing of a staging repository.

use stagehand_core::settings::Settings;
use stagehand_util::progress::status;

/// Ask the server to close `repository_id`. Does not wait for the checks.
pub async fn close(settings: &Settings, repository_id: &str) -> miette::Result<()> {
    let orchestrator = crate::connect(settings)?;
    orchestrator.close(repository_id).await?;
    status("Closing", &format!("{repository_id} (checks run on the server)"));
    Ok(())
}
