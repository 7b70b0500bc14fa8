//! Operation: close a repository, block until the checks pass, then release it.

use stagehand_core::settings::Settings;
use stagehand_util::progress::status;

pub async fn close_and_release(
    settings: &Settings,
    repository_id: &str,
    drop_after_release: bool,
) -> miette::Result<()> {
    let orchestrator = crate::connect(settings)?;

    orchestrator.close(repository_id).await?;
    status("Closing", repository_id);

    crate::wait_with_spinner(&orchestrator, settings, repository_id).await?;
    status("Closed", repository_id);

    orchestrator.release(repository_id, drop_after_release).await?;
    status("Released", repository_id);
    Ok(())
}
