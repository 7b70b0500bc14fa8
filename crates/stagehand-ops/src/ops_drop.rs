//! Operation: delete a staging repository and its content.

use stagehand_core::settings::Settings;
use stagehand_util::progress::status;

pub async fn drop_repository(settings: &Settings, repository_id: &str) -> miette::Result<()> {
    let orchestrator = crate::connect(settings)?;
    orchestrator.drop(repository_id).await?;
    status("Dropped", repository_id);
    Ok(())
}
