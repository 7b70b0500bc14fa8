//! Operation: promote a closed staging repository.

use stagehand_core::settings::Settings;
use stagehand_util::progress::status;

/// Release `repository_id`. There is no undo.
pub async fn release(
    settings: &Settings,
    repository_id: &str,
    drop_after_release: bool,
) -> miette::Result<()> {
    let orchestrator = crate::connect(settings)?;
    orchestrator.release(repository_id, drop_after_release).await?;
    status("Released", repository_id);
    Ok(())
}
